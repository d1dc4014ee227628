//! Role-driven routing: sections, landing routes, and navigation menus.
//!
//! DESIGN
//! ======
//! Every role's landing route lies inside a section that admits that role, so
//! a section layout redirecting a disallowed user to their landing route can
//! never bounce back to itself. Unknown roles fail open to the HR dashboard.

#[cfg(test)]
#[path = "navigation_test.rs"]
mod navigation_test;

use crate::net::types::Role;

pub const LOGIN_ROUTE: &str = "/login";
pub const DEFAULT_LANDING_ROUTE: &str = "/hr/dashboard";

/// A role-gated route subtree with its own layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Admin,
    Hr,
    Candidate,
}

impl Section {
    pub fn base_path(self) -> &'static str {
        match self {
            Self::Admin => "/admin",
            Self::Hr => "/hr",
            Self::Candidate => "/candidate",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Admin => "Super Admin",
            Self::Hr => "HR Workspace",
            Self::Candidate => "Candidate Portal",
        }
    }

    /// Whether `role` may stay inside this section.
    pub fn admits(self, role: &Role) -> bool {
        match self {
            Self::Admin => matches!(role, Role::SuperAdmin),
            Self::Hr => matches!(role, Role::HrAdmin | Role::HrUser | Role::SuperAdmin | Role::Unknown(_)),
            Self::Candidate => matches!(role, Role::Candidate),
        }
    }
}

/// Where a freshly signed-in user of `role` lands.
pub fn landing_route(role: &Role) -> &'static str {
    match role {
        Role::SuperAdmin => "/admin",
        Role::HrAdmin => "/hr/admin",
        Role::HrUser | Role::Unknown(_) => DEFAULT_LANDING_ROUTE,
        Role::Candidate => "/candidate/dashboard",
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
}

const fn item(label: &'static str, path: &'static str) -> NavItem {
    NavItem { label, path }
}

const ADMIN_NAV: &[NavItem] = &[
    item("Global Overview", "/admin"),
    item("Tenants / Companies", "/admin/companies"),
    item("User Provisioning", "/admin/users"),
    item("Access Control", "/admin/access"),
];

const HR_USER_NAV: &[NavItem] = &[
    item("Dashboard", "/hr/dashboard"),
    item("Talent Pool", "/hr/talent"),
    item("Upload Resumes", "/hr/upload"),
    item("Job Descriptions", "/hr/jobs"),
    item("Smart Match AI", "/hr/match"),
    item("Match History", "/hr/history"),
];

const HR_ADMIN_NAV: &[NavItem] = &[
    item("Analytics", "/hr/admin"),
    item("Talent Pool", "/hr/talent"),
    item("Upload Resumes", "/hr/upload"),
    item("Job Descriptions", "/hr/jobs"),
    item("Smart Match AI", "/hr/match"),
    item("Match History", "/hr/history"),
];

const CANDIDATE_NAV: &[NavItem] = &[
    item("Dashboard", "/candidate/dashboard"),
    item("Practice Arena", "/candidate/practice"),
    item("Mock Interviews", "/candidate/interviews"),
    item("Leaderboard", "/candidate/leaderboard"),
];

/// Sidebar entries for `role` inside `section`.
pub fn nav_items(section: Section, role: &Role) -> &'static [NavItem] {
    match section {
        Section::Admin => ADMIN_NAV,
        Section::Hr if *role == Role::HrAdmin => HR_ADMIN_NAV,
        Section::Hr => HR_USER_NAV,
        Section::Candidate => CANDIDATE_NAV,
    }
}

/// Label of the nav entry matching `path`, for page headings.
///
/// Matches exactly first, then by longest prefix so nested routes such as
/// `/hr/jobs/new` resolve to their parent entry.
pub fn page_title(section: Section, role: &Role, path: &str) -> &'static str {
    let path = path.trim_end_matches('/');
    let items = nav_items(section, role);
    items
        .iter()
        .find(|i| i.path == path)
        .or_else(|| {
            items
                .iter()
                .filter(|i| i.path != section.base_path() && path.starts_with(&format!("{}/", i.path)))
                .max_by_key(|i| i.path.len())
        })
        .map_or_else(|| section.title(), |i| i.label)
}
