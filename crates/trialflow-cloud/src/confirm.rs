//! Interactive confirmation seam
//!
//! Destructive actions ask through this trait so the executor stays testable
//! without a TTY. The default answer is always the safe one: anything but an
//! explicit yes aborts.

/// Asks the operator for confirmation before a destructive step
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Reads the answer from stdin; EOF or ambiguous input means no
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        use std::io::Write;

        print!("{} [y/N]: ", prompt);
        let _ = std::io::stdout().flush();

        let mut answer = String::new();
        match std::io::stdin().read_line(&mut answer) {
            Ok(0) => false,
            Ok(_) => {
                let answer = answer.trim().to_ascii_lowercase();
                answer == "y" || answer == "yes"
            }
            Err(_) => false,
        }
    }
}

/// Approves everything (`--auto-approve`)
#[derive(Debug, Default)]
pub struct AutoApprove;

impl Confirm for AutoApprove {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Declines everything
#[derive(Debug, Default)]
pub struct Deny;

impl Confirm for Deny {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_approve() {
        assert!(AutoApprove.confirm("destroy everything?"));
    }

    #[test]
    fn test_deny() {
        assert!(!Deny.confirm("destroy everything?"));
    }
}
