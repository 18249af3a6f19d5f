pub mod clock;
pub mod identity;
pub mod login;
pub mod token;

pub use clock::{Clock, ManualClock, SystemClock};
pub use identity::Identity;
pub use login::{Authenticator, LoginAttempt, OpenAuthenticator};
pub use token::{IssuedToken, TokenCodec, TokenError};
