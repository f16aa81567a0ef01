//! Protobuf records exchanged with the upstream game API.
//!
//! The schemas are fixed by the game server. Field tags must not change.
//!
//! ```proto
//! message like          { int64 uid = 1; string region = 2; }
//! message uid_generator { int64 saturn_ = 1; int64 garena = 2; }
//! message Info          { AccountInfo AccountInfo = 1; }
//! message AccountInfo   { uint64 UID = 1; string PlayerNickname = 3; uint32 Likes = 21; }
//! ```
//!
//! Unknown fields in upstream responses are skipped by `prost`, so only the
//! fields this service reads are declared on [`AccountInfo`].

/// Body of a like action, encrypted before sending.
#[derive(Clone, PartialEq, prost::Message)]
pub struct LikeRequest {
    #[prost(int64, tag = "1")]
    pub uid: i64,
    #[prost(string, tag = "2")]
    pub region: String,
}

/// Body of a profile lookup, encrypted before sending.
#[derive(Clone, PartialEq, prost::Message)]
pub struct UidLookup {
    #[prost(int64, tag = "1")]
    pub saturn: i64,
    /// Always `1` on the wire.
    #[prost(int64, tag = "2")]
    pub garena: i64,
}

/// Envelope of a profile lookup response.
#[derive(Clone, PartialEq, prost::Message)]
pub struct PlayerInfo {
    #[prost(message, optional, tag = "1")]
    pub account_info: Option<AccountInfo>,
}

/// The profile fields read before and after a dispatch.
#[derive(Clone, PartialEq, prost::Message)]
pub struct AccountInfo {
    #[prost(uint64, tag = "1")]
    pub uid: u64,
    #[prost(string, tag = "3")]
    pub nickname: String,
    #[prost(uint32, tag = "21")]
    pub likes: u32,
}
