use crate::parser::{self, Word};
use crate::shell::Shell;

use tracing::debug;

/// Produces the final argv for a conjunct: alias expansion on the first
/// word, then `$?` substitution on every unquoted word.
///
/// Alias expansion is a single pass; the replacement is never re-expanded,
/// so alias loops cannot form.
pub fn expand_words(shell: &Shell, words: &[Word]) -> Vec<String> {
    let mut expanded: Vec<Word> = Vec::with_capacity(words.len());
    let mut rest = words.iter();

    if let Some(first) = rest.next() {
        match alias_replacement(shell, first) {
            Some(replacement) => {
                debug!("alias {} -> {}", first.text, replacement);
                expanded.extend(parser::tokenize_words(&replacement));
            }
            None => expanded.push(first.clone()),
        }
    }
    expanded.extend(rest.cloned());

    expanded
        .into_iter()
        .map(|word| {
            if !word.quoted && word.text == "$?" {
                shell.last_status().to_string()
            } else {
                word.text
            }
        })
        .collect()
}

// Aliases never fire for quoted command names.
fn alias_replacement(shell: &Shell, first: &Word) -> Option<String> {
    if first.quoted {
        return None;
    }
    shell.aliases().get(&first.text).map(str::to_owned)
}
