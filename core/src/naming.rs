//! # Naming Conventions
//!
//! Helpers shared by discovery and patching for turning member and type names
//! into generated identifiers.

/// Strips underscores and upper-cases the first letter of every segment.
///
/// `user_id` becomes `UserId`, `Name` stays `Name`, `userID` becomes `UserID`.
/// Raw identifiers lose their prefix: `r#type` becomes `Type`.
pub fn clean_member_name(name: &str) -> String {
    let name = name.strip_prefix("r#").unwrap_or(name);
    name.split('_')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Builds a description constant name: `{Owner}{CleanedMember}`.
pub fn description_constant(owner: &str, member: &str) -> String {
    format!("{}{}", owner, clean_member_name(member))
}

/// Returns the last path segment of a type name (`a::b::User` -> `User`).
///
/// Both `::` and `.` separators are accepted.
pub fn simple_name(name: &str) -> &str {
    let last = name.rsplit("::").next().unwrap_or(name);
    last.rsplit('.').next().unwrap_or(last)
}

/// Splits a qualified name into its path segments.
pub fn path_segments(name: &str) -> Vec<&str> {
    name.split("::")
        .flat_map(|part| part.split('.'))
        .filter(|part| !part.is_empty())
        .collect()
}

/// Removes a leading `{module}::` from a fully-qualified name.
pub fn strip_module_prefix<'a>(name: &'a str, module: &str) -> &'a str {
    if module.is_empty() {
        return name;
    }
    name.strip_prefix(module)
        .and_then(|rest| rest.strip_prefix("::"))
        .unwrap_or(name)
}

/// Normalises a controller version prefix (`v0.5` -> `v05`).
pub fn normalize_version_prefix(prefix: &str) -> String {
    prefix.trim().replace('.', "")
}
