//! Session identity.

use std::fmt;

use wodclock_proto::{ChannelName, TenantId, WorkoutId};

/// Which end of the channel a session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Runs the authoritative timer and broadcasts its state
    Display,
    /// Mirrors the Display and sends commands
    Remote,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Display => "display",
            Self::Remote => "remote",
        })
    }
}

/// Who is running what, for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// Tenant whose channel the session joins
    pub tenant: TenantId,
    /// Workout being run or mirrored
    pub workout_id: WorkoutId,
    /// Session role
    pub role: Role,
}

impl SessionContext {
    /// Context for a Display session.
    pub fn display(tenant: TenantId, workout_id: WorkoutId) -> Self {
        Self { tenant, workout_id, role: Role::Display }
    }

    /// Context for a Remote session.
    pub fn remote(tenant: TenantId, workout_id: WorkoutId) -> Self {
        Self { tenant, workout_id, role: Role::Remote }
    }

    /// Channel shared by every session of this tenant.
    pub fn channel_name(&self) -> ChannelName {
        ChannelName::for_tenant(&self.tenant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_remote_meet_on_tenant_channel() {
        let tenant = TenantId::new("crossfit-north").unwrap();
        let display = SessionContext::display(tenant.clone(), WorkoutId::new("fran"));
        let remote = SessionContext::remote(tenant, WorkoutId::new("murph"));

        assert_eq!(display.role, Role::Display);
        assert_eq!(remote.role, Role::Remote);
        assert_eq!(display.role.to_string(), "display");
        assert_eq!(remote.role.to_string(), "remote");
        assert_eq!(display.channel_name(), remote.channel_name());
        assert_eq!(display.channel_name().as_str(), "crossfit-north:timer");
    }
}
