mod meetup;
mod user;

pub use meetup::{DateRange, Meetup, MeetupChanges, NewMeetup, PageRequest};
pub use user::{NewUser, User, UserChanges};
