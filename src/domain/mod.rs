//! Business rules for users and their tasks. Services in here are "driving ports" called by the
//! API, and they reach storage through "driven ports" implemented in [crate::persistence].

pub mod task;
pub mod user;

#[cfg(test)]
pub(crate) mod test_util;

/// Treats a missing or whitespace-only field the same way: as "keep the current value"
pub(crate) fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_owned)
}
