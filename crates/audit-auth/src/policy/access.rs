//! Access policy over audit records. Pure, performs no I/O.

use audit_core::config::auth::AuthConfig;
use audit_entity::{AuditRecord, CallerIdentity, SearchFilter};

use super::decision::{Decision, DenyReason};

/// Decides who may read, search and delete audit records.
///
/// Admins see and delete everything. Everyone else is confined to records
/// they authored.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    /// Role marker that grants administrative access.
    admin_role: String,
}

impl AccessPolicy {
    /// Creates a policy treating `admin_role` as the admin marker.
    pub fn new(admin_role: impl Into<String>) -> Self {
        Self {
            admin_role: admin_role.into(),
        }
    }

    /// Creates a policy from auth configuration.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.admin_role.clone())
    }

    /// Returns whether the caller is an administrator.
    pub fn is_admin(&self, caller: &CallerIdentity) -> bool {
        caller.is_admin(&self.admin_role)
    }

    /// Requires a verified caller.
    pub fn authenticate<'a>(
        &self,
        caller: Option<&'a CallerIdentity>,
    ) -> Decision<&'a CallerIdentity> {
        match caller {
            Some(caller) => Decision::Permit(caller),
            None => Decision::Deny(DenyReason::Unauthenticated),
        }
    }

    /// Checks a search and returns the filter to actually run.
    ///
    /// A non-admin filter is always scoped to the caller's own user id; asking
    /// for someone else's id is refused.
    pub fn authorize_search(
        &self,
        caller: Option<&CallerIdentity>,
        filter: SearchFilter,
    ) -> Decision<SearchFilter> {
        let caller = match self.authenticate(caller) {
            Decision::Permit(caller) => caller,
            Decision::Deny(reason) => return Decision::Deny(reason),
        };
        if self.is_admin(caller) {
            return Decision::Permit(filter);
        }

        if let Some(ref requested) = filter.changed_by_user_id
            && *requested != caller.user_id
        {
            return Decision::Deny(DenyReason::ForeignScope);
        }
        Decision::Permit(filter.scoped_to(caller.user_id.clone()))
    }

    /// Checks a single-record read. A record hidden from the caller is
    /// reported as absent.
    pub fn authorize_read(
        &self,
        caller: Option<&CallerIdentity>,
        record: Option<AuditRecord>,
    ) -> Decision<Option<AuditRecord>> {
        let caller = match self.authenticate(caller) {
            Decision::Permit(caller) => caller,
            Decision::Deny(reason) => return Decision::Deny(reason),
        };
        let visible =
            record.filter(|r| self.is_admin(caller) || r.is_owned_by(&caller.user_id));
        Decision::Permit(visible)
    }

    /// Returns whether deleting on behalf of `caller` needs the record fetched
    /// first to check ownership.
    pub fn requires_ownership_check(&self, caller: &CallerIdentity) -> bool {
        !self.is_admin(caller)
    }

    /// Checks that `caller` may delete `record`.
    pub fn authorize_delete(&self, caller: &CallerIdentity, record: &AuditRecord) -> Decision<()> {
        if self.is_admin(caller) || record.is_owned_by(&caller.user_id) {
            Decision::Permit(())
        } else {
            Decision::Deny(DenyReason::NotOwner)
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::from_config(&AuthConfig::default())
    }
}
