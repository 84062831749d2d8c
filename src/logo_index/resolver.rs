use super::LogoIndex;
use crate::config::CandidatePolicy;
use crate::utils::normalize_key;

/// Ordered lookup keys for one channel. Earlier keys win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidates(Vec<String>);

impl Candidates {
    /// Build from a channel's tvg-id and name, ordered by `policy`.
    /// Blank values are dropped.
    pub fn for_channel(tvg_id: Option<&str>, name: Option<&str>, policy: CandidatePolicy) -> Self {
        let ordered = match policy {
            CandidatePolicy::IdFirst => [tvg_id, name],
            CandidatePolicy::NameFirst => [name, tvg_id],
        };

        Self(
            ordered
                .into_iter()
                .flatten()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Return the path of the first candidate whose normalized form is indexed.
pub fn pick_path<'a, I, S>(index: &'a LogoIndex, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates.into_iter().find_map(|candidate| {
        let key = normalize_key(candidate.as_ref());
        if key.is_empty() {
            None
        } else {
            index.get(&key)
        }
    })
}
