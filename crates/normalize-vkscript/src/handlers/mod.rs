//! Built-in VKScript handlers for the Python subset VKScript can express.
//!
//! Statement handlers terminate their own fragment (`;` or `}`) so the
//! driver can concatenate them without separators. Compound expressions
//! parenthesize themselves, which keeps Python's grouping intact
//! regardless of VKScript's precedence rules.

mod calls;
mod expressions;
mod statements;
mod strings;

use crate::registry::HandlerRegistry;

/// Install every built-in handler into `registry`.
pub fn register_defaults(registry: &HandlerRegistry) {
    // Statements
    registry.register("expression_statement", statements::expression_statement);
    registry.register("assignment", statements::assignment);
    registry.register("augmented_assignment", statements::augmented_assignment);
    registry.register("return_statement", statements::return_statement);
    registry.register("if_statement", statements::if_statement);
    registry.register("while_statement", statements::while_statement);
    registry.register("pass_statement", statements::pass_statement);

    // Literals
    registry.register("identifier", expressions::identifier);
    registry.register("integer", expressions::integer);
    registry.register("float", expressions::float);
    registry.register("true", expressions::keyword_literal);
    registry.register("false", expressions::keyword_literal);
    registry.register("none", expressions::keyword_literal);
    registry.register("string", strings::string);
    registry.register("concatenated_string", strings::concatenated_string);

    // Operators
    registry.register("binary_operator", expressions::binary_operator);
    registry.register("comparison_operator", expressions::comparison_operator);
    registry.register("boolean_operator", expressions::boolean_operator);
    registry.register("not_operator", expressions::not_operator);
    registry.register("unary_operator", expressions::unary_operator);
    registry.register("parenthesized_expression", expressions::parenthesized_expression);

    // Collections and access
    registry.register("list", expressions::sequence);
    registry.register("tuple", expressions::sequence);
    registry.register("dictionary", expressions::dictionary);
    registry.register("subscript", expressions::subscript);
    registry.register("attribute", expressions::attribute);

    registry.register("call", calls::call);
}
