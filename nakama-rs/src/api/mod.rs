//! Endpoint wrappers, one `impl NakamaClient` block per area.

mod account;
mod events;
mod friends;
mod groups;
mod leaderboards;
mod matches;
mod notifications;
mod purchases;
mod rpc;
mod storage;

pub use groups::GroupListQuery;
pub use leaderboards::TournamentListQuery;
pub use matches::MatchListQuery;
