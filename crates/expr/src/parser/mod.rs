//! # Parser
//!
//! Recursive-descent parser for the condition grammar: a subset of the
//! familiar infix expression syntax (`a and b > 1`, `x in ('a', 'b')`,
//! `1 if flag else 2`). Constructs outside the subset are recognised just far
//! enough to report which node kind was used.
//!
//! ```text
//! expression  = test ("," test)* [","]
//! test        = or_test ["if" or_test "else" test]
//! or_test     = and_test ("or" and_test)*
//! and_test    = not_test ("and" not_test)*
//! not_test    = "not" not_test | comparison
//! comparison  = bit_or (cmp_op bit_or)*
//! bit_or      = bit_xor ("|" bit_xor)*
//! bit_xor     = bit_and ("^" bit_and)*
//! bit_and     = shift ("&" shift)*
//! shift       = arith (("<<" | ">>") arith)*
//! arith       = term (("+" | "-") term)*
//! term        = factor (("*" | "/" | "//" | "%" | "@") factor)*
//! factor      = ("+" | "-" | "~") factor | power
//! power       = atom ["**" factor]
//! atom        = name | literal+ | "(" [test ("," test)* [","]] ")"
//!             | "[" [test ("," test)* [","]] "]" | "{" test ("," test)* [","] "}"
//!             | "set" "(" ")"
//! ```

use crate::lexer::{Spanned, Token, tokenize};
use crate::{BinaryOp, BoolOp, CmpOp, Constant, Expr, ParseError, UnaryOp};


const KEYWORDS: &[&str] = &[
	"False", "None", "True", "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif", "else",
	"except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise",
	"return", "try", "while", "with", "yield",
];

const AUG_ASSIGN: &[&str] = &["+=", "-=", "*=", "/=", "//=", "%=", "**=", "@=", "&=", "|=", "^=", "<<=", ">>="];

/// Brackets, prefix operators, exponents and conditional tails that may open
/// inside one another.
pub const MAX_NESTING: usize = 100;

/// Longest root-to-leaf path a parsed tree may have.
pub const MAX_TREE_DEPTH: usize = 1000;

/// Parses expression text into an [`Expr`].
///
/// # Errors
///
/// Returns [`ParseError`] for malformed text and for constructs outside the
/// supported subset; in the latter case [`ParseError::node`] names the
/// construct. Text nested deeper than [`MAX_NESTING`] or producing a tree
/// deeper than [`MAX_TREE_DEPTH`] is also refused.
pub fn parse_source(source: &str) -> Result<Expr, ParseError> {
	let tokens = tokenize(source)?;
	let mut parser = Parser {
		tokens,
		position: 0,
		nesting: 0,
	};
	let expr = parser.expression()?;
	parser.finish()?;
	parser.check_depth(&expr)?;
	Ok(expr)
}

struct Parser {
	tokens: Vec<Spanned>,
	position: usize,
	nesting: usize,
}

impl Parser {
	fn peek(&self) -> &Token {
		self.peek_nth(0)
	}

	fn peek_nth(&self, n: usize) -> &Token {
		self.tokens
			.get(self.position + n)
			.or_else(|| self.tokens.last())
			.map_or(&Token::End, |spanned| &spanned.token)
	}

	fn offset(&self) -> usize {
		self.tokens
			.get(self.position)
			.or_else(|| self.tokens.last())
			.map_or(0, |spanned| spanned.position)
	}

	fn next(&mut self) -> Token {
		let token = self.peek().clone();
		if self.position < self.tokens.len() {
			self.position += 1;
		}
		token
	}

	fn is_op(&self, op: &str) -> bool {
		matches!(self.peek(), Token::Op(o) if *o == op)
	}

	fn is_keyword(&self, keyword: &str) -> bool {
		matches!(self.peek(), Token::Name(n) if n == keyword)
	}

	fn eat_op(&mut self, op: &str) -> bool {
		let found = self.is_op(op);
		if found {
			self.position += 1;
		}
		found
	}

	fn eat_keyword(&mut self, keyword: &str) -> bool {
		let found = self.is_keyword(keyword);
		if found {
			self.position += 1;
		}
		found
	}

	fn expect_op(&mut self, op: &str) -> Result<(), ParseError> {
		if self.eat_op(op) {
			Ok(())
		} else {
			Err(self.unexpected(&format!("expected '{op}'")))
		}
	}

	fn unexpected(&self, context: &str) -> ParseError {
		let found = match self.peek() {
			Token::End => "end of input".to_owned(),
			Token::Name(n) => format!("'{n}'"),
			Token::Op(o) => format!("'{o}'"),
			Token::Int(_) | Token::Float(_) | Token::Imaginary => "number".to_owned(),
			Token::Str(_) | Token::Bytes(_) | Token::FString => "string".to_owned(),
		};
		ParseError::new(format!("{context}, found {found}"), self.offset())
	}

	fn unsupported(&self, node: &'static str) -> ParseError {
		ParseError::unsupported(node, self.offset())
	}

	/// Runs `parse` one nesting level deeper.
	fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T, ParseError>) -> Result<T, ParseError> {
		if self.nesting >= MAX_NESTING {
			return Err(ParseError::new(
				format!("expression nested more than {MAX_NESTING} levels deep"),
				self.offset(),
			));
		}
		self.nesting += 1;
		let result = parse(self);
		self.nesting -= 1;
		result
	}

	fn check_depth(&self, expr: &Expr) -> Result<(), ParseError> {
		if expr.depth() > MAX_TREE_DEPTH {
			return Err(ParseError::new(
				format!("expression tree deeper than {MAX_TREE_DEPTH} levels"),
				self.offset(),
			));
		}
		Ok(())
	}

	fn finish(&mut self) -> Result<(), ParseError> {
		match self.peek() {
			Token::End => Ok(()),
			Token::Op("=") => Err(self.unsupported("Assign")),
			Token::Op(":=") => Err(self.unsupported("NamedExpr")),
			Token::Op(op) if AUG_ASSIGN.contains(op) => Err(self.unsupported("AugAssign")),
			_ => Err(self.unexpected("invalid syntax")),
		}
	}

	/// Top level: a bare comma-separated list becomes a tuple.
	fn expression(&mut self) -> Result<Expr, ParseError> {
		let first = self.element()?;
		if !self.is_op(",") {
			return Ok(first);
		}
		let mut elements = vec![first];
		while self.eat_op(",") {
			if matches!(self.peek(), Token::End) || self.is_op("=") {
				break;
			}
			elements.push(self.element()?);
		}
		Ok(Expr::tuple(elements))
	}

	/// One member of a tuple, list or set display.
	fn element(&mut self) -> Result<Expr, ParseError> {
		if self.is_op("*") || self.is_op("**") {
			return Err(self.unsupported("Starred"));
		}
		let expr = self.test()?;
		if self.is_op(":=") {
			return Err(self.unsupported("NamedExpr"));
		}
		if self.is_keyword("for") || self.is_keyword("async") {
			return Err(self.unsupported("GeneratorExp"));
		}
		Ok(expr)
	}

	fn test(&mut self) -> Result<Expr, ParseError> {
		if self.is_keyword("lambda") {
			return Err(self.unsupported("Lambda"));
		}
		if self.is_keyword("yield") {
			return Err(self.unsupported("Yield"));
		}
		let body = self.or_test()?;
		if !self.eat_keyword("if") {
			return Ok(body);
		}
		let test = self.or_test()?;
		if !self.eat_keyword("else") {
			return Err(self.unexpected("expected 'else' in conditional expression"));
		}
		let orelse = self.nested(Self::test)?;
		Ok(Expr::if_else(test, body, orelse))
	}

	fn or_test(&mut self) -> Result<Expr, ParseError> {
		let mut values = vec![self.and_test()?];
		while self.eat_keyword("or") {
			values.push(self.and_test()?);
		}
		Ok(Expr::bool_op(BoolOp::Or, values))
	}

	fn and_test(&mut self) -> Result<Expr, ParseError> {
		let mut values = vec![self.not_test()?];
		while self.eat_keyword("and") {
			values.push(self.not_test()?);
		}
		Ok(Expr::bool_op(BoolOp::And, values))
	}

	fn not_test(&mut self) -> Result<Expr, ParseError> {
		if self.eat_keyword("not") {
			let operand = self.nested(Self::not_test)?;
			return Ok(Expr::unary(UnaryOp::Not, operand));
		}
		self.comparison()
	}

	fn comparison(&mut self) -> Result<Expr, ParseError> {
		let left = self.binary(0)?;
		let mut links = Vec::new();
		while let Some(op) = self.cmp_op()? {
			links.push((op, self.binary(0)?));
		}
		Ok(Expr::compare(left, links))
	}

	fn cmp_op(&mut self) -> Result<Option<CmpOp>, ParseError> {
		if self.is_keyword("not") && matches!(self.peek_nth(1), Token::Name(m) if m == "in") {
			self.position += 2;
			return Ok(Some(CmpOp::NotIn));
		}
		if self.is_keyword("is") {
			let node = if matches!(self.peek_nth(1), Token::Name(m) if m == "not") { "IsNot" } else { "Is" };
			return Err(self.unsupported(node));
		}
		let op = match self.peek() {
			Token::Op("==") => CmpOp::Eq,
			Token::Op("!=") => CmpOp::NotEq,
			Token::Op("<") => CmpOp::Lt,
			Token::Op("<=") => CmpOp::LtE,
			Token::Op(">") => CmpOp::Gt,
			Token::Op(">=") => CmpOp::GtE,
			Token::Name(n) if n == "in" => CmpOp::In,
			_ => return Ok(None),
		};
		self.position += 1;
		Ok(Some(op))
	}

	/// Left-associative binary levels from `|` down to the multiplicative
	/// operators, selected by `level`.
	fn binary(&mut self, level: usize) -> Result<Expr, ParseError> {
		const LEVELS: &[&[(&str, BinaryOp)]] = &[
			&[("|", BinaryOp::BitOr)],
			&[("^", BinaryOp::BitXor)],
			&[("&", BinaryOp::BitAnd)],
			&[("<<", BinaryOp::LShift), (">>", BinaryOp::RShift)],
			&[("+", BinaryOp::Add), ("-", BinaryOp::Sub)],
			&[
				("*", BinaryOp::Mul),
				("/", BinaryOp::Div),
				("//", BinaryOp::FloorDiv),
				("%", BinaryOp::Mod),
				("@", BinaryOp::MatMul),
			],
		];

		let Some(ops) = LEVELS.get(level) else {
			return self.factor();
		};
		let mut left = self.binary(level + 1)?;
		loop {
			let Some(op) = ops.iter().find(|(symbol, _)| self.is_op(symbol)).map(|(_, op)| *op) else {
				return Ok(left);
			};
			self.position += 1;
			let right = self.binary(level + 1)?;
			left = Expr::binary(left, op, right);
			self.check_depth(&left)?;
		}
	}

	fn factor(&mut self) -> Result<Expr, ParseError> {
		let op = match self.peek() {
			Token::Op("-") => UnaryOp::Neg,
			Token::Op("+") => UnaryOp::Pos,
			Token::Op("~") => UnaryOp::Invert,
			_ => return self.power(),
		};
		let start = self.offset();
		self.position += 1;

		// `-5` is a single negative constant unless the literal is a `**` base.
		if op == UnaryOp::Neg && !matches!(self.peek_nth(1), Token::Op("**")) {
			match self.peek().clone() {
				Token::Int(magnitude) => {
					self.position += 1;
					return negative_int(magnitude, start).map(Expr::constant);
				}
				Token::Float(value) => {
					self.position += 1;
					return Ok(Expr::constant(-value));
				}
				_ => {}
			}
		}

		let operand = self.nested(Self::factor)?;
		Ok(Expr::unary(op, operand))
	}

	fn power(&mut self) -> Result<Expr, ParseError> {
		if self.is_keyword("await") {
			return Err(self.unsupported("Await"));
		}
		let base = self.atom()?;
		self.trailers()?;
		if self.eat_op("**") {
			let exponent = self.nested(Self::factor)?;
			return Ok(Expr::binary(base, BinaryOp::Pow, exponent));
		}
		Ok(base)
	}

	fn trailers(&self) -> Result<(), ParseError> {
		match self.peek() {
			Token::Op("(") => Err(self.unsupported("Call")),
			Token::Op("[") => Err(self.unsupported("Subscript")),
			Token::Op(".") => Err(self.unsupported("Attribute")),
			_ => Ok(()),
		}
	}

	fn atom(&mut self) -> Result<Expr, ParseError> {
		let start = self.offset();
		match self.next() {
			Token::Name(name) => self.name(name, start),
			Token::Int(magnitude) => positive_int(magnitude, start).map(Expr::constant),
			Token::Float(value) => Ok(Expr::constant(value)),
			Token::Imaginary => Err(ParseError::unsupported("Constant", start)),
			Token::FString => Err(ParseError::unsupported("JoinedStr", start)),
			Token::Str(first) => self.strings(Some(first), None, start),
			Token::Bytes(first) => self.strings(None, Some(first), start),
			Token::Op("(") => self.nested(Self::parenthesized),
			Token::Op("[") => self.nested(Self::list),
			Token::Op("{") => self.nested(Self::brace),
			Token::Op("...") => Err(ParseError::unsupported("Ellipsis", start)),
			_ => {
				self.position -= 1;
				Err(self.unexpected("expected an expression"))
			}
		}
	}

	fn name(&mut self, name: String, start: usize) -> Result<Expr, ParseError> {
		match name.as_str() {
			"None" => return Ok(Expr::constant(Constant::None)),
			"True" => return Ok(Expr::constant(true)),
			"False" => return Ok(Expr::constant(false)),
			"set" if self.is_op("(") && matches!(self.peek_nth(1), Token::Op(")")) => {
				self.position += 2;
				return Ok(Expr::set([]));
			}
			_ => {}
		}
		if KEYWORDS.contains(&name.as_str()) {
			return Err(ParseError::new(format!("invalid syntax: unexpected keyword '{name}'"), start));
		}
		Ok(Expr::name(name))
	}

	/// Adjacent string literals concatenate; mixing text and bytes is an error.
	fn strings(&mut self, mut text: Option<String>, mut bytes: Option<Vec<u8>>, start: usize) -> Result<Expr, ParseError> {
		loop {
			match (self.peek(), &mut text, &mut bytes) {
				(Token::Str(next), Some(text), None) => text.push_str(next),
				(Token::Bytes(next), None, Some(bytes)) => bytes.extend_from_slice(next),
				(Token::FString, ..) => return Err(self.unsupported("JoinedStr")),
				(Token::Str(_) | Token::Bytes(_), ..) => {
					return Err(ParseError::new("cannot mix bytes and nonbytes literals", start));
				}
				_ => break,
			}
			self.position += 1;
		}
		Ok(match (text, bytes) {
			(Some(text), _) => Expr::constant(text),
			(None, bytes) => Expr::constant(Constant::Bytes(bytes.unwrap_or_default().into())),
		})
	}

	fn parenthesized(&mut self) -> Result<Expr, ParseError> {
		if self.eat_op(")") {
			return Ok(Expr::tuple([]));
		}
		if self.is_keyword("yield") {
			return Err(self.unsupported("Yield"));
		}
		let first = self.element()?;
		if self.eat_op(")") {
			return Ok(first);
		}
		let elements = self.rest_of_sequence(first, ")")?;
		Ok(Expr::tuple(elements))
	}

	fn list(&mut self) -> Result<Expr, ParseError> {
		if self.eat_op("]") {
			return Ok(Expr::list([]));
		}
		let first = self.display_element("ListComp")?;
		let elements = self.rest_of_sequence(first, "]")?;
		Ok(Expr::list(elements))
	}

	fn brace(&mut self) -> Result<Expr, ParseError> {
		if self.is_op("}") || self.is_op("**") {
			return Err(self.unsupported("Dict"));
		}
		let first = self.display_element("SetComp")?;
		if self.is_op(":") {
			return Err(self.unsupported("Dict"));
		}
		let elements = self.rest_of_sequence(first, "}")?;
		Ok(Expr::set(elements))
	}

	fn display_element(&mut self, comprehension: &'static str) -> Result<Expr, ParseError> {
		match self.element() {
			Err(err) if err.node == Some("GeneratorExp") => Err(ParseError::unsupported(comprehension, err.position)),
			other => other,
		}
	}

	/// Continues a comma-separated display after its first element, through
	/// the closing delimiter.
	fn rest_of_sequence(&mut self, first: Expr, close: &str) -> Result<Vec<Expr>, ParseError> {
		let mut elements = vec![first];
		loop {
			if self.eat_op(close) {
				return Ok(elements);
			}
			self.expect_op(",")?;
			if self.eat_op(close) {
				return Ok(elements);
			}
			elements.push(self.element()?);
		}
	}
}

fn positive_int(magnitude: u64, position: usize) -> Result<Constant, ParseError> {
	i64::try_from(magnitude)
		.map(Constant::Int)
		.map_err(|_| ParseError::new(format!("integer literal {magnitude} does not fit in 64 bits"), position))
}

fn negative_int(magnitude: u64, position: usize) -> Result<Constant, ParseError> {
	0i64.checked_sub_unsigned(magnitude)
		.map(Constant::Int)
		.ok_or_else(|| ParseError::new(format!("integer literal -{magnitude} does not fit in 64 bits"), position))
}
