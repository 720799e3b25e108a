pub mod keys;
pub mod sign_bytes;
pub mod user;

pub use keys::{PrivateKey, PublicKey};
pub use sign_bytes::{build_sign_bytes, sign_tx};
pub use user::{register_migrations, user_bucket, UserData, PACKAGE, USER_BUCKET};
