pub mod directory;
pub mod mapping;
pub mod processing;

pub use directory::{DirectoryUser, UserQuery};
pub use mapping::{IdentifierSet, LEGACY_NO_MATCH, Mapping, Resolution, ResolutionTable};
pub use processing::{PhaseKind, PhaseReport, RunReport};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_report_flags_failures() {
        let report = RunReport {
            phases: vec![
                PhaseReport::completed(PhaseKind::Extract, 4, None),
                PhaseReport::failed(PhaseKind::Split, 2, "disk full"),
            ],
        };
        assert!(report.has_failures());
        assert_eq!(report.phases[1].message.as_deref(), Some("disk full"));
    }

    #[test]
    fn directory_user_deserializes_tracker_payload() {
        let json = r#"{
            "self": "https://tracker/rest/api/2/user?username=jdoe",
            "name": "jdoe",
            "emailAddress": "jdoe@example.com",
            "displayName": "John Doe",
            "active": true
        }"#;
        let user: DirectoryUser = serde_json::from_str(json).expect("deserialize user");
        assert_eq!(user.name, "jdoe");
        assert_eq!(user.email_address.as_deref(), Some("jdoe@example.com"));
        assert_eq!(user.display_name, "John Doe");
    }
}
