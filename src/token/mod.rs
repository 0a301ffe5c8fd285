mod clock;
mod record;
mod refresher;

pub use clock::{Clock, FixedClock, SystemClock};
pub use record::{TokenError, TokenRecord};
pub use refresher::{RefreshResponse, TokenRefresher};
