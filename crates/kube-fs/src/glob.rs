//! Segment-wise glob expansion relative to a base directory.
//!
//! Patterns are matched one path segment at a time, so `*` never crosses a
//! `/`. A `**` segment matches the current directory and every directory
//! below it. Wildcard segments do not match dot-entries unless the segment
//! itself starts with `.`.

use crate::{Error, NormalizedPath, Result, io};
use globset::{GlobBuilder, GlobMatcher};

const GLOB_META: &[char] = &['*', '?', '[', '{'];
const RECURSIVE: &str = "**";

/// Expand `pattern` (relative to `base`) into the existing paths it names,
/// sorted.
pub fn expand(base: &NormalizedPath, pattern: &str) -> Result<Vec<NormalizedPath>> {
    let mut frontier = vec![base.clone()];

    for segment in NormalizedPath::new(pattern).segments() {
        let mut next = Vec::new();
        if segment == RECURSIVE {
            for dir in frontier.iter().filter(|p| p.is_dir()) {
                next.push(dir.clone());
                descendants(dir, &mut next)?;
            }
        } else if segment.contains(GLOB_META) {
            let matcher = compile(pattern, segment)?;
            let include_hidden = segment.starts_with('.');
            for dir in &frontier {
                for entry in io::list_dir(dir)? {
                    let Some(name) = entry.file_name() else {
                        continue;
                    };
                    if name.starts_with('.') && !include_hidden {
                        continue;
                    }
                    if matcher.is_match(name) {
                        next.push(entry);
                    }
                }
            }
        } else {
            next.extend(frontier.iter().map(|dir| dir.join(segment)));
        }
        frontier = next;
    }

    let mut matches: Vec<NormalizedPath> = frontier.into_iter().filter(|p| p.exists()).collect();
    matches.sort();
    matches.dedup();
    Ok(matches)
}

/// Append every non-hidden directory below `dir`, depth first.
fn descendants(dir: &NormalizedPath, out: &mut Vec<NormalizedPath>) -> Result<()> {
    for sub in io::list_subdirs(dir)? {
        if sub.file_name().is_some_and(|name| name.starts_with('.')) {
            continue;
        }
        out.push(sub.clone());
        descendants(&sub, out)?;
    }
    Ok(())
}

fn compile(pattern: &str, segment: &str) -> Result<GlobMatcher> {
    GlobBuilder::new(segment)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| Error::InvalidGlob {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}
