pub mod error;
mod parsed_expr;
#[allow(clippy::module_inception)]
mod parser;

pub use error::{ParseError, ParseErrorKind};
pub use parsed_expr::{Argument, ArrayElement, CastType, Expr, ParsedExpr};
pub use parser::{parse, parse_token_stream, parse_with_options};
