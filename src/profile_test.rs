use super::*;

// =============================================================================
// Role
// =============================================================================

#[test]
fn role_parse_known_values() {
    assert_eq!(Role::parse("admin"), Role::Admin);
    assert_eq!(Role::parse("talent"), Role::Talent);
    assert_eq!(Role::parse("recruiter"), Role::Recruiter);
}

#[test]
fn role_parse_is_case_sensitive() {
    assert_eq!(Role::parse("Admin"), Role::Other("Admin".into()));
}

#[test]
fn role_unknown_value_preserved() {
    let role = Role::parse("moderator");
    assert!(!role.is_known());
    assert_eq!(role.as_str(), "moderator");
    assert_eq!(role.to_string(), "moderator");
}

#[test]
fn role_home_routes() {
    assert_eq!(Role::Admin.home_route(), Some("/admin"));
    assert_eq!(Role::Talent.home_route(), Some("/talent/dashboard"));
    assert_eq!(Role::Recruiter.home_route(), Some("/recruiter/dashboard"));
    assert_eq!(Role::Other("x".into()).home_route(), None);
}

#[test]
fn role_serializes_as_plain_string() {
    assert_eq!(serde_json::to_string(&Role::Recruiter).unwrap(), "\"recruiter\"");
    let parsed: Role = serde_json::from_str("\"guest\"").unwrap();
    assert_eq!(parsed, Role::Other("guest".into()));
}

// =============================================================================
// UserProfile
// =============================================================================

#[test]
fn profile_keeps_backend_fields() {
    let json = r#"{"role":"talent","fname":"Ada","lname":"Lovelace","id":7}"#;
    let profile: UserProfile = serde_json::from_str(json).unwrap();
    assert_eq!(profile.role(), Some(&Role::Talent));
    assert_eq!(profile.field("fname"), Some(&Value::from("Ada")));
    assert_eq!(profile.field("id"), Some(&Value::from(7)));
}

#[test]
fn profile_without_role_parses() {
    let profile: UserProfile = serde_json::from_str(r#"{"email":"a@b.com"}"#).unwrap();
    assert!(profile.role().is_none());
    assert!(!profile.has_role(&Role::Admin));
}

#[test]
fn profile_non_string_role_is_rejected() {
    let parsed: Result<UserProfile, _> = serde_json::from_str(r#"{"role":42}"#);
    assert!(parsed.is_err());
}

#[test]
fn profile_serialize_includes_role_and_fields() {
    let profile = UserProfile::with_role(Role::Admin).with_field("email", "root@example.com");
    let value = serde_json::to_value(&profile).unwrap();
    assert_eq!(value["role"], "admin");
    assert_eq!(value["email"], "root@example.com");
}

#[test]
fn has_role_matches_exact_known_role() {
    let profile = UserProfile::with_role(Role::Talent);
    assert!(profile.has_role(&Role::Talent));
    assert!(!profile.has_role(&Role::Admin));
}

#[test]
fn has_role_never_matches_unknown_role() {
    let profile = UserProfile::with_role(Role::Other("superuser".into()));
    assert!(!profile.has_role(&Role::Other("superuser".into())));
}
