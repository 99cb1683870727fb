//! The typed launch record extracted from a verified request.

use serde::{Deserialize, Serialize};

use crate::request::ParameterSource;

pub const USER_ID: &str = "user_id";
pub const ROLES: &str = "roles";
pub const LTI_VERSION: &str = "lti_version";
pub const LTI_MESSAGE_TYPE: &str = "lti_message_type";
pub const RESOURCE_LINK_ID: &str = "resource_link_id";
pub const CONTEXT_ID: &str = "context_id";
pub const LAUNCH_PRESENTATION_RETURN_URL: &str = "launch_presentation_return_url";
pub const TOOL_CONSUMER_INSTANCE_GUID: &str = "tool_consumer_instance_guid";

/// Message type of a regular LTI 1.x launch.
pub const BASIC_LAUNCH_REQUEST: &str = "basic-lti-launch-request";

const LIS_ROLE_PREFIXES: [&str; 2] = ["urn:lti:role:ims/lis/", "urn:lti:instrole:ims/lis/"];

/// The launching user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// LMS-assigned user id, verbatim. Empty when the launch carried none.
    pub id: String,

    /// Roles in parameter order. Duplicates are kept.
    pub roles: Vec<String>,
}

impl User {
    pub fn new(id: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            id: id.into(),
            roles,
        }
    }

    /// Whether the user holds a role.
    ///
    /// Matches the role string exactly, or the short name of an LIS role URN:
    /// `Instructor` matches `urn:lti:role:ims/lis/Instructor`.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|held| {
            held == role
                || LIS_ROLE_PREFIXES
                    .iter()
                    .any(|prefix| held.strip_prefix(prefix) == Some(role))
        })
    }
}

/// Split a comma-delimited `roles` value, trimming each segment.
///
/// Order and duplicates are preserved. An empty or blank value yields no
/// roles rather than a single empty role; blank segments inside a list are
/// kept, so a non-blank value has one role per segment.
pub fn parse_roles(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|role| role.trim().to_string()).collect()
}

/// Launch record of a verified LTI 1.x request.
///
/// Absent parameters are `None`; extraction itself never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LtiLaunch {
    pub user: User,
    pub version: Option<String>,
    pub message_type: Option<String>,
    pub resource_link_id: Option<String>,
    pub context_id: Option<String>,
    pub launch_presentation_return_url: Option<String>,
    pub tool_consumer_instance_guid: Option<String>,
}

impl LtiLaunch {
    /// Read the launch parameters off a verified request.
    pub fn from_source<S>(source: &S) -> Self
    where
        S: ParameterSource + ?Sized,
    {
        let get = |name: &str| source.parameter(name).map(str::to_string);

        Self {
            user: User {
                id: source.parameter(USER_ID).unwrap_or_default().to_string(),
                roles: source.parameter(ROLES).map(parse_roles).unwrap_or_default(),
            },
            version: get(LTI_VERSION),
            message_type: get(LTI_MESSAGE_TYPE),
            resource_link_id: get(RESOURCE_LINK_ID),
            context_id: get(CONTEXT_ID),
            launch_presentation_return_url: get(LAUNCH_PRESENTATION_RETURN_URL),
            tool_consumer_instance_guid: get(TOOL_CONSUMER_INSTANCE_GUID),
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Whether this is a `basic-lti-launch-request`.
    pub fn is_basic_launch(&self) -> bool {
        self.message_type.as_deref() == Some(BASIC_LAUNCH_REQUEST)
    }
}
