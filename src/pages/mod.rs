mod admin;
mod home;
mod layout;
pub(crate) mod projects;
mod sections;

pub(crate) use admin::{
    AdminDashboardPage, AdminLoginPage, AdminMediaPage, AdminProjectDetailPage, AdminProjectsPage,
    AdminSettingsPage,
};
pub(crate) use home::HomePage;
pub(crate) use layout::{AdminGuard, SiteHeader};
pub(crate) use projects::{ProjectDetailPage, ProjectsPage};
