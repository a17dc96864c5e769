//! Utils

use std::path::PathBuf;

use clap::Parser;

use crate::clusters::DualAffiliationPolicy;

/// Arguments for the plan demo
#[derive(Debug, Parser)]
pub struct PlanArgs {
    /// Plan to optimise, by name, from the plans directory
    #[clap(short, long, default_value = "colorado")]
    pub plan: String,

    /// Directory holding plan files
    #[clap(long, default_value = "data/plans")]
    pub plans_dir: PathBuf,

    /// Catalog file; the bundled catalog when omitted
    #[clap(short, long)]
    pub catalog: Option<PathBuf>,

    /// How to treat resorts on both Epic and Ikon
    #[clap(long, value_enum, default_value_t = DualAffiliationPolicy::default())]
    pub policy: DualAffiliationPolicy,

    /// Log filter used when `RUST_LOG` is unset
    #[clap(long, default_value = "warn")]
    pub log_level: String,
}

impl PlanArgs {
    /// Path of the selected plan file.
    pub fn plan_path(&self) -> PathBuf {
        self.plans_dir.join(format!("{}.yml", self.plan))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_bundled_plans() {
        let args = PlanArgs::parse_from(["plan"]);

        assert_eq!(args.plan_path(), PathBuf::from("data/plans/colorado.yml"));
        assert_eq!(args.policy, DualAffiliationPolicy::CheapestAssignment);
        assert!(args.catalog.is_none());
    }

    #[test]
    fn policy_is_parsed_from_kebab_case() {
        let args = PlanArgs::parse_from(["plan", "--policy", "prefer-ikon", "-p", "utah"]);

        assert_eq!(args.policy, DualAffiliationPolicy::PreferIkon);
        assert_eq!(args.plan_path(), PathBuf::from("data/plans/utah.yml"));
    }
}
