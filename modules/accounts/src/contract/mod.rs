pub mod model;

pub use model::{Claims, NewUser, Role, User, UserPatch};
