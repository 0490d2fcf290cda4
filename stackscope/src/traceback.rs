//! Python-style traceback rendering.

use std::fmt;

use crate::analyzer::Backtrace;

/// Renders any [`Backtrace`] least recent call first:
///
/// ```text
/// Traceback (most recent call last):
///  -> app::main [src/main.rs:12]
///  -> app::load_config [src/config.rs:40]
/// ```
pub struct Traceback<'a>(pub &'a dyn Backtrace);

impl fmt::Display for Traceback<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Traceback (most recent call last):")?;

        let mut result = Ok(());
        self.0.get_symbols(
            &mut |record| {
                if result.is_ok() {
                    result = writeln!(f, "{record}");
                }
            },
            true,
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackscope_common::{Address, SymbolRecord};

    struct Fixed(Vec<SymbolRecord>);

    impl Backtrace for Fixed {
        fn get_symbols(&self, cb: &mut dyn FnMut(&SymbolRecord), reversed: bool) {
            if reversed {
                self.0.iter().rev().for_each(cb);
            } else {
                self.0.iter().for_each(cb);
            }
        }

        fn trim_to_current_stack_frame(&mut self) {}
    }

    #[test]
    fn test_traceback_is_least_recent_first() {
        let trace = Fixed(vec![
            SymbolRecord {
                filename: "src/config.rs".to_string(),
                lineno: 40,
                function: "app::load_config".to_string(),
                addr: Address(0x2000),
            },
            SymbolRecord::name_only(Address(0x1000), "app::main".to_string()),
        ]);

        assert_eq!(
            Traceback(&trace).to_string(),
            "Traceback (most recent call last):\n -> app::main\n -> app::load_config [src/config.rs:40]\n"
        );
    }

    #[test]
    fn test_empty_traceback_has_header_only() {
        assert_eq!(Traceback(&Fixed(Vec::new())).to_string(), "Traceback (most recent call last):\n");
    }
}
