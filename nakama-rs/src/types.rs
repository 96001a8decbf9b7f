//! Type definitions mirroring Nakama API messages.
//!
//! Response types derive `Default` so a 204 answer can yield an empty value.
//! Timestamps decode from RFC 3339 strings; 64-bit integers accept both the
//! protobuf string form and plain numbers.

use crate::protojson::Int64;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::collections::HashMap;

/// Session variables attached to authentication and refresh requests.
pub type Vars = HashMap<String, String>;

// ============================================================================
// Authentication
// ============================================================================

/// Session tokens returned by authenticate and refresh calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSession {
    /// Whether a new account was created by this call.
    #[serde(default)]
    pub created: bool,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub refresh_token: String,
}

/// Apple Sign In credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountApple {
    pub token: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub vars: Vars,
}

/// Custom identifier credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountCustom {
    pub id: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub vars: Vars,
}

/// Device identifier credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountDevice {
    pub id: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub vars: Vars,
}

/// Email and password credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountEmail {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub vars: Vars,
}

/// Facebook OAuth token credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountFacebook {
    pub token: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub vars: Vars,
}

/// Facebook Instant Game signed player info.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountFacebookInstantGame {
    pub signed_player_info: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub vars: Vars,
}

/// Apple Game Center identity verification.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountGameCenter {
    pub player_id: String,
    pub bundle_id: String,
    #[serde_as(as = "Int64")]
    pub timestamp_seconds: i64,
    pub salt: String,
    pub signature: String,
    pub public_key_url: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub vars: Vars,
}

/// Google Sign In token credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountGoogle {
    pub token: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub vars: Vars,
}

/// Steam session ticket credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountSteam {
    pub token: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub vars: Vars,
}

impl AccountDevice {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            vars: Vars::new(),
        }
    }
}

impl AccountCustom {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            vars: Vars::new(),
        }
    }
}

impl AccountEmail {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            vars: Vars::new(),
        }
    }
}

macro_rules! token_account_new {
    ($($ty:ident),+) => {
        $(
            impl $ty {
                pub fn new(token: impl Into<String>) -> Self {
                    Self {
                        token: token.into(),
                        vars: Vars::new(),
                    }
                }
            }
        )+
    };
}

token_account_new!(AccountApple, AccountFacebook, AccountGoogle, AccountSteam);

// ============================================================================
// Account
// ============================================================================

/// A user as seen by other users.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiUser {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub lang_tag: Option<String>,
    pub location: Option<String>,
    pub timezone: Option<String>,
    /// JSON-encoded metadata object.
    pub metadata: Option<String>,
    pub facebook_id: Option<String>,
    pub google_id: Option<String>,
    pub gamecenter_id: Option<String>,
    pub steam_id: Option<String>,
    pub apple_id: Option<String>,
    pub facebook_instant_game_id: Option<String>,
    pub online: bool,
    pub edge_count: i32,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
}

/// A device linked to an account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiAccountDevice {
    pub id: String,
    pub vars: Vars,
}

/// The current user's full account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiAccount {
    pub user: ApiUser,
    /// JSON-encoded wallet object.
    pub wallet: Option<String>,
    pub email: Option<String>,
    pub devices: Vec<ApiAccountDevice>,
    pub custom_id: Option<String>,
    pub verify_time: Option<DateTime<Utc>>,
    pub disable_time: Option<DateTime<Utc>>,
}

/// Fields to change on the current account. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateAccountRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// A list of users.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Users {
    pub users: Vec<ApiUser>,
}

// ============================================================================
// Friends
// ============================================================================

proto_enum! {
    /// Relationship between the caller and another user.
    pub enum FriendState {
        /// Mutual friends.
        Friend = 0 => "FRIEND",
        /// Invitation sent by the caller.
        InviteSent = 1 => "INVITE_SENT",
        /// Invitation received by the caller.
        InviteReceived = 2 => "INVITE_RECEIVED",
        /// The caller blocked this user.
        Blocked = 3 => "BLOCKED",
    }
    fallback = Friend;
}

/// A friend of the current user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiFriend {
    pub user: ApiUser,
    pub state: FriendState,
    pub update_time: Option<DateTime<Utc>>,
    pub metadata: Option<String>,
}

/// A page of friends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FriendList {
    pub friends: Vec<ApiFriend>,
    pub cursor: Option<String>,
}

/// A friend of a friend, with the friend that links them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FriendOfFriend {
    pub referrer: String,
    pub user: ApiUser,
}

/// A page of friends of friends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FriendsOfFriendsList {
    pub friends_of_friends: Vec<FriendOfFriend>,
    pub cursor: Option<String>,
}

// ============================================================================
// Groups
// ============================================================================

proto_enum! {
    /// A user's role in a group.
    pub enum GroupUserState {
        Superadmin = 0 => "SUPERADMIN",
        Admin = 1 => "ADMIN",
        Member = 2 => "MEMBER",
        /// Pending approval to join.
        JoinRequest = 3 => "JOIN_REQUEST",
        Banned = 4 => "BANNED",
    }
    fallback = Member;
}

/// A group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiGroup {
    pub id: String,
    pub creator_id: String,
    pub name: String,
    pub description: Option<String>,
    pub lang_tag: Option<String>,
    pub metadata: Option<String>,
    pub avatar_url: Option<String>,
    pub open: bool,
    pub edge_count: i32,
    pub max_count: i32,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
}

/// A page of groups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupList {
    pub groups: Vec<ApiGroup>,
    pub cursor: Option<String>,
}

/// A member of a group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupUser {
    pub user: ApiUser,
    pub state: GroupUserState,
}

/// A page of group members.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupUserList {
    pub group_users: Vec<GroupUser>,
    pub cursor: Option<String>,
}

/// A group a user belongs to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserGroup {
    pub group: ApiGroup,
    pub state: GroupUserState,
}

/// A page of a user's groups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserGroupList {
    pub user_groups: Vec<UserGroup>,
    pub cursor: Option<String>,
}

/// Parameters for a new group.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_count: Option<i32>,
}

/// Fields to change on a group. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateGroupRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<bool>,
}

// ============================================================================
// Leaderboards
// ============================================================================

proto_enum! {
    /// How a submitted score combines with the existing record.
    pub enum Operator {
        /// Use the leaderboard's configured operator.
        NoOverride = 0 => "NO_OVERRIDE",
        Best = 1 => "BEST",
        Set = 2 => "SET",
        Increment = 3 => "INCREMENT",
        Decrement = 4 => "DECREMENT",
    }
    fallback = NoOverride;
}

/// A leaderboard or tournament record.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardRecord {
    pub leaderboard_id: String,
    pub owner_id: String,
    pub username: Option<String>,
    #[serde_as(as = "Int64")]
    pub score: i64,
    #[serde_as(as = "Int64")]
    pub subscore: i64,
    pub num_score: i32,
    pub metadata: Option<String>,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
    pub expiry_time: Option<DateTime<Utc>>,
    #[serde_as(as = "Int64")]
    pub rank: i64,
    pub max_num_score: u32,
}

/// A page of leaderboard records.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardRecordList {
    pub records: Vec<LeaderboardRecord>,
    pub owner_records: Vec<LeaderboardRecord>,
    pub next_cursor: Option<String>,
    pub prev_cursor: Option<String>,
    #[serde_as(as = "Int64")]
    pub rank_count: i64,
}

/// A score to submit to a leaderboard or tournament.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize)]
pub struct LeaderboardRecordWrite {
    #[serde_as(as = "Int64")]
    pub score: i64,
    #[serde_as(as = "Int64")]
    pub subscore: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
}

// ============================================================================
// Tournaments
// ============================================================================

/// A tournament.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tournament {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: u32,
    /// 0 for ascending, 1 for descending.
    pub sort_order: u32,
    pub size: u32,
    pub max_size: u32,
    pub max_num_score: u32,
    pub can_enter: bool,
    /// Unix time when the current period ends.
    pub end_active: u32,
    pub next_reset: u32,
    pub prev_reset: u32,
    pub metadata: Option<String>,
    pub create_time: Option<DateTime<Utc>>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration: u32,
    pub start_active: u32,
    pub operator: Operator,
    pub authoritative: bool,
    pub join_required: bool,
}

/// A page of tournaments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentList {
    pub tournaments: Vec<Tournament>,
    pub cursor: Option<String>,
}

/// A page of tournament records.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentRecordList {
    pub records: Vec<LeaderboardRecord>,
    pub owner_records: Vec<LeaderboardRecord>,
    pub next_cursor: Option<String>,
    pub prev_cursor: Option<String>,
    #[serde_as(as = "Int64")]
    pub rank_count: i64,
}

// ============================================================================
// Storage
// ============================================================================

/// A stored object. `value` is a JSON-encoded object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageObject {
    pub collection: String,
    pub key: String,
    pub user_id: String,
    pub value: String,
    pub version: String,
    pub permission_read: i32,
    pub permission_write: i32,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
}

impl StorageObject {
    /// Decode the JSON value into a typed structure.
    pub fn value_as<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.value)
    }
}

/// Objects returned by a batch read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageObjects {
    pub objects: Vec<StorageObject>,
}

/// A page of objects in a collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageObjectList {
    pub objects: Vec<StorageObject>,
    pub cursor: Option<String>,
}

/// Acknowledgement of one stored object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageObjectAck {
    pub collection: String,
    pub key: String,
    pub version: String,
    pub user_id: String,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
}

/// Acknowledgements returned by a batch write.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageObjectAcks {
    pub acks: Vec<StorageObjectAck>,
}

/// Identifies an object to read.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReadStorageObjectId {
    pub collection: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// An object to write. `value` must be a JSON-encoded object.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WriteStorageObject {
    pub collection: String,
    pub key: String,
    pub value: String,
    /// Optimistic concurrency version; `"*"` writes only if absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_read: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_write: Option<i32>,
}

impl WriteStorageObject {
    /// Build a write request with `value` encoded as JSON.
    pub fn json<T: Serialize>(
        collection: impl Into<String>,
        key: impl Into<String>,
        value: &T,
    ) -> serde_json::Result<Self> {
        Ok(Self {
            collection: collection.into(),
            key: key.into(),
            value: serde_json::to_string(value)?,
            ..Default::default()
        })
    }
}

/// Identifies an object to delete.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeleteStorageObjectId {
    pub collection: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

// ============================================================================
// Notifications
// ============================================================================

/// A notification delivered to the current user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Notification {
    pub id: String,
    pub subject: String,
    /// JSON-encoded content object.
    pub content: String,
    pub code: i32,
    pub sender_id: String,
    pub create_time: Option<DateTime<Utc>>,
    pub persistent: bool,
}

/// A page of notifications.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationList {
    pub notifications: Vec<Notification>,
    pub cacheable_cursor: Option<String>,
}

// ============================================================================
// Matches and channels
// ============================================================================

/// A realtime match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Match {
    pub match_id: String,
    pub authoritative: bool,
    pub label: Option<String>,
    pub size: i32,
    pub tick_rate: i32,
    pub handler_name: String,
}

/// Matches returned by a listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchList {
    pub matches: Vec<Match>,
}

/// A message in a chat channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelMessage {
    pub channel_id: String,
    pub message_id: String,
    pub code: i32,
    pub sender_id: String,
    pub username: String,
    /// JSON-encoded content object.
    pub content: String,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
    pub persistent: bool,
    pub room_name: Option<String>,
    pub group_id: Option<String>,
    pub user_id_one: Option<String>,
    pub user_id_two: Option<String>,
}

/// A page of channel messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelMessageList {
    pub messages: Vec<ChannelMessage>,
    pub next_cursor: Option<String>,
    pub prev_cursor: Option<String>,
    pub cacheable_cursor: Option<String>,
}

// ============================================================================
// RPC
// ============================================================================

/// Result of a server RPC function.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Rpc {
    pub id: String,
    pub payload: String,
    pub http_key: Option<String>,
}

// ============================================================================
// In-app purchases
// ============================================================================

proto_enum! {
    /// Store that processed a purchase.
    pub enum StoreProvider {
        AppleAppStore = 0 => "APPLE_APP_STORE",
        GooglePlayStore = 1 => "GOOGLE_PLAY_STORE",
        HuaweiAppGallery = 2 => "HUAWEI_APP_GALLERY",
        FacebookInstantStore = 3 => "FACEBOOK_INSTANT_STORE",
    }
    fallback = AppleAppStore;
}

proto_enum! {
    /// Store environment of a purchase.
    pub enum StoreEnvironment {
        Unknown = 0 => "UNKNOWN",
        Sandbox = 1 => "SANDBOX",
        Production = 2 => "PRODUCTION",
    }
    fallback = Unknown;
}

/// A validated one-off purchase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatedPurchase {
    pub user_id: String,
    pub product_id: String,
    pub transaction_id: String,
    pub store: StoreProvider,
    pub purchase_time: Option<DateTime<Utc>>,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
    pub refund_time: Option<DateTime<Utc>>,
    /// Raw store response.
    pub provider_response: String,
    pub environment: StoreEnvironment,
    /// Whether the purchase was already recorded.
    pub seen_before: bool,
}

/// Result of validating a purchase receipt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatePurchaseResponse {
    pub validated_purchases: Vec<ValidatedPurchase>,
}

/// A validated subscription.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatedSubscription {
    pub user_id: String,
    pub product_id: String,
    pub original_transaction_id: String,
    pub store: StoreProvider,
    pub purchase_time: Option<DateTime<Utc>>,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
    pub environment: StoreEnvironment,
    pub expiry_time: Option<DateTime<Utc>>,
    pub refund_time: Option<DateTime<Utc>>,
    pub provider_response: String,
    pub provider_notification: String,
    pub active: bool,
}

/// Result of validating a subscription receipt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateSubscriptionResponse {
    pub validated_subscription: ValidatedSubscription,
}

/// A page of subscriptions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriptionList {
    pub validated_subscriptions: Vec<ValidatedSubscription>,
    pub cursor: Option<String>,
    pub prev_cursor: Option<String>,
}

// ============================================================================
// Events
// ============================================================================

/// A custom analytics event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub external: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_leaderboard_record_list_protojson() {
        let body = r#"{
            "records": [{
                "leaderboard_id": "weekly",
                "owner_id": "u1",
                "username": "alice",
                "score": "1500",
                "subscore": "3",
                "num_score": 2,
                "create_time": "2024-05-01T10:00:00Z",
                "rank": "1",
                "max_num_score": 1000000
            }],
            "rank_count": "37",
            "next_cursor": "abc"
        }"#;

        let list: LeaderboardRecordList = serde_json::from_str(body).unwrap();
        assert_eq!(list.records.len(), 1);
        let record = &list.records[0];
        assert_eq!(record.score, 1500);
        assert_eq!(record.subscore, 3);
        assert_eq!(record.rank, 1);
        assert_eq!(record.username.as_deref(), Some("alice"));
        assert!(record.create_time.is_some());
        assert!(record.expiry_time.is_none());
        assert_eq!(list.rank_count, 37);
        assert!(list.owner_records.is_empty());
    }

    #[test]
    fn test_decode_account_with_missing_fields() {
        let body = r#"{"user":{"id":"u1","username":"bob","online":true},"devices":[{"id":"d1"}]}"#;
        let account: ApiAccount = serde_json::from_str(body).unwrap();
        assert_eq!(account.user.username, "bob");
        assert!(account.user.online);
        assert_eq!(account.devices[0].id, "d1");
        assert!(account.email.is_none());
    }

    #[test]
    fn test_decode_friend_state() {
        let body = r#"{"friends":[{"user":{"id":"u2"},"state":2}],"cursor":"c"}"#;
        let list: FriendList = serde_json::from_str(body).unwrap();
        assert_eq!(list.friends[0].state, FriendState::InviteReceived);
    }

    #[test]
    fn test_encode_record_write() {
        let write = LeaderboardRecordWrite {
            score: 100,
            subscore: 0,
            metadata: None,
            operator: Some(Operator::Best),
        };
        let json = serde_json::to_value(&write).unwrap();
        assert_eq!(json, serde_json::json!({"score": "100", "subscore": "0", "operator": 1}));
    }

    #[test]
    fn test_storage_write_json_helper() {
        #[derive(Serialize)]
        struct Stats {
            level: u32,
        }
        let w = WriteStorageObject::json("saves", "slot1", &Stats { level: 7 }).unwrap();
        assert_eq!(w.value, r#"{"level":7}"#);
        let json = serde_json::to_value(&w).unwrap();
        assert!(json.get("version").is_none());
    }

    #[test]
    fn test_credentials_omit_empty_vars() {
        let device = AccountDevice {
            id: "device-1".into(),
            vars: Vars::new(),
        };
        assert_eq!(serde_json::to_string(&device).unwrap(), r#"{"id":"device-1"}"#);
    }
}
