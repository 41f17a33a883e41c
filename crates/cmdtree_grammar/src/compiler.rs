//! Template compilation.
//!
//! Walks a token stream and produces the ordered slot list of a rule. The
//! matching pattern is derived from that slot list (see [`crate::pattern`]),
//! so the slots alone are enough to rebuild a rule later.

use crate::constants::ConstantMap;
use crate::error::{Error, ErrorKind, Result};
use crate::slot::{ArgumentSlot, SlotNamer, ValuePattern, normalize_name};
use crate::token::{Token, TokenKind, is_wildcard};
use crate::tokenizer::tokenize;

/// The slots of one compiled template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledTemplate {
    /// Slots in declaration order.
    pub slots: Vec<ArgumentSlot>,
    /// Keyword links between slots.
    pub constants: ConstantMap,
}

impl CompiledTemplate {
    /// Creates a compiled template from slots, deriving the keyword links.
    #[must_use]
    pub fn from_slots(slots: Vec<ArgumentSlot>) -> Self {
        let constants = ConstantMap::from_slots(&slots);
        Self { slots, constants }
    }
}

/// Compiles template token streams into slot lists.
#[derive(Debug, Default)]
pub struct TemplateCompiler {
    namer: SlotNamer,
    next_group: usize,
}

impl TemplateCompiler {
    /// Tokenizes and compiles a template string.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be tokenized or compiled.
    pub fn compile(template: &str) -> Result<CompiledTemplate> {
        let tokens = tokenize(template)?;
        Self::compile_tokens(&tokens)
    }

    /// Compiles an already tokenized template.
    ///
    /// # Errors
    ///
    /// Returns an error if an optional block is nested in another.
    pub fn compile_tokens(tokens: &[Token]) -> Result<CompiledTemplate> {
        let mut compiler = Self::default();
        let mut slots = Vec::with_capacity(tokens.len());
        compiler.compile_into(tokens, None, &mut slots)?;
        delimit_before_punctuation(&mut slots);
        Ok(CompiledTemplate::from_slots(slots))
    }

    fn compile_into(
        &mut self,
        tokens: &[Token],
        group: Option<usize>,
        slots: &mut Vec<ArgumentSlot>,
    ) -> Result<()> {
        for token in tokens {
            let slot = match &token.kind {
                TokenKind::Literal(word) => {
                    ArgumentSlot::literal(self.namer.allocate(&normalize_name(word)), word.clone())
                }
                TokenKind::Punct(c) => {
                    ArgumentSlot::literal(self.namer.allocate("punct"), c.to_string())
                }
                TokenKind::Variable {
                    alternatives,
                    remainder,
                } => {
                    // Only the first spelling names the slot.
                    let name = self.namer.allocate(&normalize_name(&alternatives[0]));
                    let pattern = if *remainder {
                        ValuePattern::Remainder
                    } else {
                        ValuePattern::Word
                    };
                    ArgumentSlot::variable(name, pattern)
                }
                TokenKind::Choice(options) => {
                    if options.iter().any(|o| is_wildcard(o)) {
                        ArgumentSlot::variable(self.namer.allocate("rest"), ValuePattern::Remainder)
                    } else {
                        ArgumentSlot::choice(self.namer.allocate("choice"), options.clone())
                    }
                }
                TokenKind::Wildcard => {
                    ArgumentSlot::variable(self.namer.allocate("rest"), ValuePattern::Remainder)
                }
                TokenKind::Optional(inner) => {
                    if group.is_some() {
                        return Err(Error::new(ErrorKind::NestedOptional {
                            position: token.span.start,
                        }));
                    }
                    let id = self.next_group;
                    self.next_group += 1;

                    let first = slots.len();
                    self.compile_into(inner, Some(id), slots)?;
                    // The block's own separator belongs to its first slot.
                    if let Some(slot) = slots.get_mut(first) {
                        slot.joined = token.joined;
                    }
                    continue;
                }
            };

            let slot = slot.with_joined(token.joined);
            slots.push(match group {
                Some(id) => slot.in_group(id),
                None => slot,
            });
        }
        Ok(())
    }
}

/// Keeps word variables from swallowing punctuation glued after them.
fn delimit_before_punctuation(slots: &mut [ArgumentSlot]) {
    for i in 0..slots.len().saturating_sub(1) {
        let next = &slots[i + 1];
        if !(next.joined && next.is_punctuation()) {
            continue;
        }
        let stop = next.allowed[0].clone();
        if slots[i].pattern == Some(ValuePattern::Word) {
            slots[i].pattern = Some(ValuePattern::Delimited(stop));
        }
    }
}
