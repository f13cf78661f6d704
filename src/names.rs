/// Helpers for deriving physical database and user names from tenant names.
///
/// Names are derived, never stored: `prefix + shorten_name(name, max)`.
/// Distinct tenant names can collapse onto the same physical name once
/// separators are stripped or the tail is truncated; nothing here tries to
/// disambiguate them.
pub struct DatabaseNames;

impl DatabaseNames {
    /// Physical database name prefix.
    pub const PREFIX: &'static str = "memsqldb";

    /// Maximum number of characters kept from the tenant name.
    pub const MAX_LEN: usize = 32;

    /// Build the physical database name for a tenant name.
    pub fn format(name: &str) -> String {
        format!("{}{}", Self::PREFIX, shorten_name(name, Self::MAX_LEN))
    }
}

pub struct UserNames;

impl UserNames {
    /// Physical user name prefix.
    pub const PREFIX: &'static str = "memsqluser";

    /// Maximum number of characters kept from the tenant name.
    pub const MAX_LEN: usize = 22;

    /// Build the physical user name for a tenant name.
    pub fn format(name: &str) -> String {
        format!("{}{}", Self::PREFIX, shorten_name(name, Self::MAX_LEN))
    }
}

pub fn format_db_name(name: &str) -> String {
    DatabaseNames::format(name)
}

pub fn format_user_name(name: &str) -> String {
    UserNames::format(name)
}

/// Strip `-` and `_` from `name` and keep at most `len` characters.
pub fn shorten_name(name: &str, len: usize) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_')
        .take(len)
        .collect()
}
