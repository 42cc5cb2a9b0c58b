mod dashboard;
mod login;
mod media;
mod project_detail;
mod projects;
mod settings;

pub(crate) use dashboard::AdminDashboardPage;
pub(crate) use login::AdminLoginPage;
pub(crate) use media::AdminMediaPage;
pub(crate) use project_detail::AdminProjectDetailPage;
pub(crate) use projects::AdminProjectsPage;
pub(crate) use settings::AdminSettingsPage;
