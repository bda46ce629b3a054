/// Fields encoded in a sequence name such as `V1_env_200_0034_12`: the third
/// token is the timepoint (when there are at least four tokens and it is
/// numeric) and the last token is the multiplicity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceName {
    pub timepoint: Option<u64>,
    pub multiplicity: u64,
}

/// Returns `None` when the trailing token is not a number. A non-numeric
/// third token only means "no timepoint".
pub fn parse_sequence_name(name: &str) -> Option<SequenceName> {
    if name.is_empty() {
        return None;
    }

    let tokens = name.split('_').collect::<Vec<_>>();
    let multiplicity = tokens.last().and_then(|token| parse_numeric(token))?;
    let timepoint = if tokens.len() >= 4 {
        parse_numeric(tokens[2])
    } else {
        None
    };

    Some(SequenceName {
        timepoint,
        multiplicity,
    })
}

/// Digit runs too large for `u64` saturate rather than invalidating the name.
fn parse_numeric(token: &str) -> Option<u64> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(token.parse().unwrap_or(u64::MAX))
}

/// A tree leaf together with the fields decoded from its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceIdentity {
    pub name: String,
    pub color: String,
    pub timepoint: Option<u64>,
    pub multiplicity: u64,
}

impl SequenceIdentity {
    pub fn parse(name: &str, color: &str) -> Option<Self> {
        let parsed = parse_sequence_name(name)?;
        Some(Self {
            name: name.to_string(),
            color: color.to_string(),
            timepoint: parsed.timepoint,
            multiplicity: parsed.multiplicity,
        })
    }
}
