use super::{BuiltinCommand, BuiltinCommandContext};
use crate::alias::{is_reserved_name, is_valid_name};
use crate::process::ExitStatus;

pub struct Alias;

impl BuiltinCommand for Alias {
    fn run(&self, ctx: &mut BuiltinCommandContext) -> ExitStatus {
        match ctx.argv.len() {
            1 => {
                for (name, replacement) in ctx.shell.aliases().iter() {
                    println!("{}='{}'", name, replacement);
                }
                ExitStatus::ExitedWith(0)
            }
            2 => {
                // The tokenizer consumed the quotes, so the definition is
                // checked against the line as typed.
                match parse_definition(definition_text(ctx.code)) {
                    Some((name, replacement)) => {
                        ctx.shell.aliases_mut().set(name, replacement);
                        ExitStatus::ExitedWith(0)
                    }
                    None => {
                        smash_err!("alias: invalid alias");
                        ExitStatus::ExitedWith(1)
                    }
                }
            }
            _ => {
                smash_err!("alias: invalid alias");
                ExitStatus::ExitedWith(1)
            }
        }
    }
}

/// The definition part of `alias name='value'` as typed.
fn definition_text(code: &str) -> &str {
    code.trim().strip_prefix("alias").unwrap_or(code).trim()
}

/// Accepts exactly `name='value'`: a valid, unreserved name and a non-empty
/// single-quoted replacement.
fn parse_definition(definition: &str) -> Option<(&str, &str)> {
    let eq = definition.find('=')?;
    let name = &definition[..eq];
    if !is_valid_name(name) || is_reserved_name(name) {
        return None;
    }

    let replacement = definition[eq + 1..]
        .strip_prefix('\'')?
        .strip_suffix('\'')?;
    if replacement.is_empty() || replacement.contains('\'') {
        return None;
    }
    Some((name, replacement))
}

#[cfg(test)]
mod tests {
    use super::{definition_text, parse_definition};

    #[test]
    fn accepts_the_canonical_form() {
        assert_eq!(
            parse_definition("h='echo hi'"),
            Some(("h", "echo hi"))
        );
        assert_eq!(parse_definition("_x2='ls -l'"), Some(("_x2", "ls -l")));
    }

    #[test]
    fn rejects_malformed_definitions() {
        assert_eq!(parse_definition("noequals"), None);
        assert_eq!(parse_definition("='echo hi'"), None);
        assert_eq!(parse_definition("h=''"), None);
        assert_eq!(parse_definition("h='"), None);
        assert_eq!(parse_definition("h=echo"), None);
        assert_eq!(parse_definition("h=\"echo hi\""), None);
        assert_eq!(parse_definition("h='a'b'"), None);
        assert_eq!(parse_definition("bad-name='x'"), None);
    }

    #[test]
    fn rejects_reserved_names() {
        assert_eq!(parse_definition("cd='echo no'"), None);
        assert_eq!(parse_definition("quit='echo no'"), None);
    }

    #[test]
    fn strips_the_command_name_from_the_line() {
        assert_eq!(definition_text("alias h='echo hi'"), "h='echo hi'");
        assert_eq!(definition_text("  alias  h='echo hi'  "), "h='echo hi'");
    }
}
