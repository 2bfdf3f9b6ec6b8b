//! Scanning of Cypress-style command-line arguments.
//!
//! Cypress accepts both `--flag value` and `--flag=value` spellings for long
//! flags, short flags accept only `-f value`, and several flags may repeat.
//! Matching scans the argument list from the end so that taking the first
//! yielded value gives last-specified-wins semantics.

use tracing::debug;

/// Lazy, reverse-order iterator over the values of a single flag spelling.
///
/// Each occurrence contributes a value either as the immediately following
/// token (`--flag value`) or, when `allow_equal` is set, as the suffix of a
/// `--flag=value` token. A flag occurring as the final token has no value to
/// yield and is skipped.
pub struct ArgvMatches<'a> {
    argv: &'a [String],
    name: &'a str,
    allow_equal: bool,
    before: usize,
}

impl<'a> Iterator for ArgvMatches<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(index) = self.argv[..self.before]
            .iter()
            .rposition(|arg| arg.starts_with(self.name))
        {
            self.before = index;

            let arg = &self.argv[index];

            if arg == self.name {
                if index + 1 == self.argv.len() {
                    debug!("'{}' argument missing", self.name);
                } else {
                    return Some(&self.argv[index + 1]);
                }
            } else if self.allow_equal && arg[self.name.len()..].starts_with('=') {
                return Some(&arg[self.name.len() + 1..]);
            }
        }

        None
    }
}

/// Iterate the values of `name` within `argv`, last occurrence first.
pub fn traverse_argv_matching<'a>(
    argv: &'a [String],
    name: &'a str,
    allow_equal: bool,
) -> ArgvMatches<'a> {
    ArgvMatches {
        argv,
        name,
        allow_equal,
        before: argv.len(),
    }
}

/// The value of the last occurrence of `name`, if any.
pub fn find_argument_value<'a>(
    argv: &'a [String],
    name: &'a str,
    allow_equal: bool,
) -> Option<&'a str> {
    traverse_argv_matching(argv, name, allow_equal).next()
}

/// Extract comma-delimited `key=value` fragments from a single argument.
///
/// Fragments without a key or value are ignored. Order is preserved, so a key
/// repeated within one argument resolves to its last fragment when folded
/// into a map. Values may contain `=`; neither keys nor values may contain a
/// comma.
pub fn parse_key_value_pairs(argument: &str) -> Vec<(String, String)> {
    argument
        .split(',')
        .filter_map(|fragment| {
            let (key, value) = fragment.split_once('=')?;
            if key.is_empty() || value.is_empty() {
                return None;
            }
            Some((key.to_owned(), value.to_owned()))
        })
        .collect()
}
