//! Decide which mutating steps a run performs.

use std::fmt;

use crate::manager::EnvironmentState;

/// Mutating steps for one run.
///
/// `remove` implies `create`: an environment is never removed without being
/// rebuilt in the same run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupPlan {
    pub remove: bool,
    pub create: bool,
}

impl SetupPlan {
    pub fn decide(state: &EnvironmentState, recreate: bool) -> Self {
        match (state.exists(), recreate) {
            (false, _) => Self {
                remove: false,
                create: true,
            },
            (true, false) => Self {
                remove: false,
                create: false,
            },
            (true, true) => Self {
                remove: true,
                create: true,
            },
        }
    }
}

impl fmt::Display for SetupPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.remove, self.create) {
            (true, _) => f.write_str("remove and recreate"),
            (false, true) => f.write_str("create"),
            (false, false) => f.write_str("reuse existing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn present() -> EnvironmentState {
        EnvironmentState::Present {
            prefix: PathBuf::from("/opt/conda/envs/PDFTranslator"),
        }
    }

    #[test]
    fn absent_is_always_created() {
        for recreate in [false, true] {
            let plan = SetupPlan::decide(&EnvironmentState::Absent, recreate);
            assert_eq!(
                plan,
                SetupPlan {
                    remove: false,
                    create: true
                }
            );
        }
    }

    #[test]
    fn present_is_reused_without_recreate() {
        let plan = SetupPlan::decide(&present(), false);
        assert!(!plan.remove && !plan.create);
        assert_eq!(plan.to_string(), "reuse existing");
    }

    #[test]
    fn recreate_removes_then_creates() {
        let plan = SetupPlan::decide(&present(), true);
        assert!(plan.remove && plan.create);
        assert_eq!(plan.to_string(), "remove and recreate");
    }
}
