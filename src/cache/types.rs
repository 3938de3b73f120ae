pub const MATCH_STATUS_HEADER: &str = "X-Match-Status";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Where an on-demand match list came from.
pub enum MatchStatus {
    /// Fresh cached scores covered the request.
    Hit,
    /// Scores were (re)computed for the request.
    Miss,
}

impl MatchStatus {
    #[inline]
    pub fn as_header_value(&self) -> &'static str {
        match self {
            MatchStatus::Hit => "HIT",
            MatchStatus::Miss => "MISS",
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, MatchStatus::Hit)
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_header_value())
    }
}
