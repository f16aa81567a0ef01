//! Region codes and upstream clusters.
//!
//! A caller names a region with a short code such as `IND` or `BR`. Several
//! codes share one upstream cluster, and any code outside the known table falls
//! back to the default cluster instead of being rejected.

use core::fmt;

/// Path of the profile lookup endpoint on every cluster host.
pub const PROFILE_PATH: &str = "/GetPlayerPersonalShow";

/// Path of the like endpoint on every cluster host.
pub const LIKE_PATH: &str = "/LikeProfile";

/// Upstream cluster a region code resolves to.
///
/// The cluster selects both the token file and the game API host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cluster {
    India,
    Pakistan,
    Americas,
    Fallback,
}

impl Cluster {
    /// Resolves an upper-case region code. Unknown codes map to
    /// [`Cluster::Fallback`].
    pub fn from_code(code: &str) -> Self {
        match code {
            "IND" => Cluster::India,
            "PK" => Cluster::Pakistan,
            "BR" | "US" | "SAC" | "NA" => Cluster::Americas,
            _ => Cluster::Fallback,
        }
    }

    /// Name of the remote token file for this cluster.
    pub const fn token_file(self) -> &'static str {
        match self {
            Cluster::India => "token_ind.json",
            Cluster::Pakistan => "token_pk.json",
            Cluster::Americas => "token_br.json",
            Cluster::Fallback => "token_bd.json",
        }
    }

    /// Host of the game API serving this cluster.
    pub const fn host(self) -> &'static str {
        match self {
            Cluster::India => "client.ind.freefiremobile.com",
            Cluster::Pakistan => "clientpk.freefiremobile.com",
            Cluster::Americas => "client.us.freefiremobile.com",
            Cluster::Fallback => "clientbp.ggblueshark.com",
        }
    }
}

/// A normalized region code together with its resolved [`Cluster`].
///
/// The code is kept as given (upper-cased) because it is embedded verbatim in
/// the like request record, even when it resolves to the fallback cluster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    code: String,
    cluster: Cluster,
}

impl Region {
    pub fn new(code: &str) -> Self {
        let code = code.to_ascii_uppercase();
        let cluster = Cluster::from_code(&code);
        Self { code, cluster }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub const fn cluster(&self) -> Cluster {
        self.cluster
    }

    /// Full URL of the profile lookup endpoint for this region.
    pub fn profile_url(&self) -> String {
        format!("https://{}{}", self.cluster.host(), PROFILE_PATH)
    }

    /// Full URL of the like endpoint for this region.
    pub fn like_url(&self) -> String {
        format!("https://{}{}", self.cluster.host(), LIKE_PATH)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_upper_cased() {
        let region = Region::new("ind");
        assert_eq!(region.code(), "IND");
        assert_eq!(region.cluster(), Cluster::India);
    }

    #[test]
    fn americas_codes_share_a_cluster() {
        for code in ["BR", "US", "SAC", "NA"] {
            let region = Region::new(code);
            assert_eq!(region.cluster(), Cluster::Americas);
            assert_eq!(region.cluster().token_file(), "token_br.json");
            assert_eq!(
                region.like_url(),
                "https://client.us.freefiremobile.com/LikeProfile"
            );
        }
    }

    #[test]
    fn unknown_code_falls_back_but_keeps_code() {
        let region = Region::new("sg");
        assert_eq!(region.code(), "SG");
        assert_eq!(region.cluster(), Cluster::Fallback);
        assert_eq!(region.cluster().token_file(), "token_bd.json");
        assert_eq!(
            region.profile_url(),
            "https://clientbp.ggblueshark.com/GetPlayerPersonalShow"
        );
    }

    #[test]
    fn pakistan_urls() {
        let region = Region::new("PK");
        assert_eq!(
            region.profile_url(),
            "https://clientpk.freefiremobile.com/GetPlayerPersonalShow"
        );
        assert_eq!(
            region.like_url(),
            "https://clientpk.freefiremobile.com/LikeProfile"
        );
    }
}
