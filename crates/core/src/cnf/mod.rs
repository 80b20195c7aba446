use std::sync::LazyLock;

/// The name of the built-in catalog which owns all native databases.
pub const INTERNAL_CATALOG_NAME: &str = "default_catalog";

/// Specifies how deep the relation checker will descend into nested views,
/// subqueries and common table expressions before an error is returned.
pub static MAX_RELATION_DEPTH: LazyLock<u32> =
	lazy_env_parse!("STARGUARD_MAX_RELATION_DEPTH", u32, 128);
