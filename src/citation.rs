//! Split a document into plain and cited spans for highlighting
//!
//! Offsets are in characters, not bytes.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub start_index: usize,
    pub end_index: usize,
    #[serde(default)]
    pub parent_claim_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSegment {
    pub text: String,
    /// `None` for text outside every claim
    pub claim_id: Option<String>,
    pub start_index: usize,
    pub end_index: usize,
}

pub type Claims = BTreeMap<String, Claim>;

fn char_slice(chars: &[char], start: usize, end: usize) -> String {
    chars[start..end].iter().collect()
}

/// Ordered segments covering `text`, one per claim plus plain gaps.
///
/// Claims are taken by start index. A claim overlapping the previous one is
/// trimmed to start where that one ended; what is left of it is dropped if empty.
pub fn segment_text(text: &str, claims: &Claims) -> Vec<TextSegment> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    let mut sorted: Vec<(&String, &Claim)> = claims.iter().collect();
    sorted.sort_by_key(|(id, claim)| (claim.start_index, claim.end_index, id.as_str()));

    let mut segments = Vec::new();
    let mut current = 0;

    for (id, claim) in sorted {
        let start = claim.start_index.max(current).min(len);
        let end = claim.end_index.min(len);
        if start >= end {
            continue;
        }

        if start > current {
            segments.push(TextSegment {
                text: char_slice(&chars, current, start),
                claim_id: None,
                start_index: current,
                end_index: start,
            });
        }

        segments.push(TextSegment {
            text: char_slice(&chars, start, end),
            claim_id: Some(id.clone()),
            start_index: start,
            end_index: end,
        });
        current = end;
    }

    if current < len {
        segments.push(TextSegment {
            text: char_slice(&chars, current, len),
            claim_id: None,
            start_index: current,
            end_index: len,
        });
    }

    segments
}

/// Ids of claims without parents
pub fn root_claims(claims: &Claims) -> Vec<String> {
    claims
        .iter()
        .filter(|(_, claim)| claim.parent_claim_ids.is_empty())
        .map(|(id, _)| id.clone())
        .collect()
}

/// Length of the longest parent chain above `claim_id`. Unknown ids and
/// roots have depth 0. A parent already on the current chain closes a cycle
/// and counts as one more level.
pub fn claim_depth(claim_id: &str, claims: &Claims) -> usize {
    let mut memo = HashMap::new();
    depth_along(claim_id, claims, &mut HashSet::new(), &mut memo)
}

/// Depth of every claim, sharing one memo across the whole set
pub fn claim_depths(claims: &Claims) -> BTreeMap<String, usize> {
    let mut memo = HashMap::new();
    claims
        .keys()
        .map(|id| {
            let depth = depth_along(id, claims, &mut HashSet::new(), &mut memo);
            (id.clone(), depth)
        })
        .collect()
}

fn depth_along<'a>(
    claim_id: &'a str,
    claims: &'a Claims,
    path: &mut HashSet<&'a str>,
    memo: &mut HashMap<&'a str, usize>,
) -> usize {
    if let Some(&depth) = memo.get(claim_id) {
        return depth;
    }
    let Some(claim) = claims.get(claim_id) else {
        return 0;
    };
    if claim.parent_claim_ids.is_empty() {
        return 0;
    }

    path.insert(claim_id);
    let mut depth = 0;
    for parent in &claim.parent_claim_ids {
        let above = if path.contains(parent.as_str()) {
            0
        } else {
            depth_along(parent, claims, path, memo)
        };
        depth = depth.max(above + 1);
    }
    path.remove(claim_id);

    memo.insert(claim_id, depth);
    depth
}
