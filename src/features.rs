use std::fmt;
use std::str::FromStr;

/// Optional assembler behavior, enabled with `--features a,b`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    /// Reject a label defined more than once instead of keeping the first definition.
    pub strict_labels: bool,
}

impl FromStr for Features {
    type Err = String;
    fn from_str(string: &str) -> Result<Self, Self::Err> {
        let mut features = Self::default();
        for word in string.split(',') {
            let value = match word.trim() {
                "" => continue,
                "strict-labels" => &mut features.strict_labels,
                other => return Err(format!("Unknown feature '{}'", other)),
            };
            if *value {
                return Err(format!("Cannot specify feature '{}' twice", word.trim()));
            }
            *value = true;
        }
        Ok(features)
    }
}

impl fmt::Display for Features {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let features = [("strict-labels", self.strict_labels)];
        let mut has_any_feature = false;
        for (name, value) in features {
            if !value {
                continue;
            }
            if has_any_feature {
                write!(f, ",")?;
            }
            write!(f, "{}", name)?;
            has_any_feature = true;
        }
        Ok(())
    }
}
