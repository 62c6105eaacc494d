// Services layer for business logic
// Services own conversions and storage access; precondition checks that
// produce specific HTTP errors live in the route handlers.

pub mod education;
pub mod employee;
pub mod experience;
pub mod license;
pub mod role;
pub mod user;

pub use education::EducationService;
pub use employee::EmployeeService;
pub use experience::ExperienceService;
pub use license::LicenseService;
pub use role::RoleService;
pub use user::UserService;
