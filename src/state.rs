use std::fmt;

/// Service check verdict, ordered by severity.
///
/// Labels and exit codes follow the Nagios plugin convention: the label
/// leads the one-line service output, the exit code is the process status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckState {
    Ok,
    Warning,
    Critical,
}

impl CheckState {
    pub fn label(self) -> &'static str {
        match self {
            CheckState::Ok => "OK",
            CheckState::Warning => "WARNING",
            CheckState::Critical => "CRITICAL",
        }
    }

    pub fn exit_code(self) -> i32 {
        match self {
            CheckState::Ok => 0,
            CheckState::Warning => 1,
            CheckState::Critical => 2,
        }
    }
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(CheckState::Critical > CheckState::Warning);
        assert!(CheckState::Warning > CheckState::Ok);
    }

    #[test]
    fn exit_codes_match_labels() {
        assert_eq!(CheckState::Ok.exit_code(), 0);
        assert_eq!(CheckState::Warning.exit_code(), 1);
        assert_eq!(CheckState::Critical.exit_code(), 2);
        assert_eq!(CheckState::Critical.label(), "CRITICAL");
    }
}
