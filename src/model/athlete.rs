use serde::Serialize;

/// Join key shared by both test tables: trimmed, title-cased athlete name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AthleteKey(String);

impl AthleteKey {
    /// Returns `None` when the name is blank after trimming.
    pub fn normalize(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(title_case(trimmed)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filesystem-safe form used for per-athlete artifact names.
    pub fn slug(&self) -> String {
        let mut out = String::with_capacity(self.0.len());
        let mut last_sep = true;
        for c in self.0.chars() {
            if c.is_alphanumeric() {
                out.extend(c.to_lowercase());
                last_sep = false;
            } else if !last_sep {
                out.push('_');
                last_sep = true;
            }
        }
        while out.ends_with('_') {
            out.pop();
        }
        if out.is_empty() {
            out.push_str("athlete");
        }
        out
    }
}

impl std::fmt::Display for AthleteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest,
/// so "  JUAN  pérez" and "juan Pérez" meet on "Juan  Pérez".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/athlete.rs"]
mod tests;
