use crate::error::EvalError;
use std::f64::consts::{E, PI};
use tracing::{debug, trace};

/// Named functions the evaluator resolves. Nothing else is callable.
pub const FUNCTIONS: [&str; 7] = ["sqrt", "sin", "cos", "tan", "log", "log10", "factorial"];

/// Named constants the evaluator resolves.
pub const CONSTANTS: [&str; 2] = ["pi", "e"];

/// Largest n whose factorial still fits in an f64.
const MAX_FACTORIAL: i128 = 170;

/// Nesting bound for groups, calls, signs and exponents.
const MAX_DEPTH: usize = 128;

/// A number during evaluation. Integer literals and integer results of
/// `+ - * ^ !` stay exact while they fit in an `i128`; everything else,
/// including any overflow, is carried as an `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i128),
    Float(f64),
}

impl Value {
    pub fn as_f64(self) -> f64 {
        match self {
            Value::Int(n) => n as f64,
            Value::Float(x) => x,
        }
    }

    fn is_zero(self) -> bool {
        self.as_f64() == 0.0
    }

    fn combine(
        self,
        rhs: Value,
        exact: fn(i128, i128) -> Option<i128>,
        float: fn(f64, f64) -> f64,
    ) -> Value {
        if let (Value::Int(a), Value::Int(b)) = (self, rhs) {
            if let Some(n) = exact(a, b) {
                return Value::Int(n);
            }
        }
        Value::Float(float(self.as_f64(), rhs.as_f64()))
    }

    fn add(self, rhs: Value) -> Value {
        self.combine(rhs, i128::checked_add, |a, b| a + b)
    }

    fn sub(self, rhs: Value) -> Value {
        self.combine(rhs, i128::checked_sub, |a, b| a - b)
    }

    fn mul(self, rhs: Value) -> Value {
        self.combine(rhs, i128::checked_mul, |a, b| a * b)
    }

    fn neg(self) -> Value {
        match self {
            Value::Int(n) => n.checked_neg().map_or(Value::Float(-(n as f64)), Value::Int),
            Value::Float(x) => Value::Float(-x),
        }
    }

    /// Division is always real, as on a pocket calculator: `6/3` is `2.0`.
    fn div(self, rhs: Value) -> Result<Value, EvalError> {
        if rhs.is_zero() {
            return Err(EvalError::DivisionByZero);
        }
        Ok(Value::Float(self.as_f64() / rhs.as_f64()))
    }

    fn pow(self, exponent: Value) -> Result<Value, EvalError> {
        if self.is_zero() && exponent.as_f64() < 0.0 {
            return Err(EvalError::DivisionByZero);
        }
        if let (Value::Int(base), Value::Int(exp)) = (self, exponent) {
            if let Some(n) = u32::try_from(exp).ok().and_then(|exp| base.checked_pow(exp)) {
                return Ok(Value::Int(n));
            }
        }

        let (base, exp) = (self.as_f64(), exponent.as_f64());
        let result = base.powf(exp);
        if !result.is_finite() {
            return Err(EvalError::calc(format!("{} ^ {} is not a real number", base, exp)));
        }
        Ok(Value::Float(result))
    }
}

#[derive(Debug, PartialEq)]
pub enum Token {
    Number(Value),
    Op(char),
    Ident(String),
    LParen,
    RParen,
    Comma,
}

/// Maps the display glyphs a keypad may produce onto the operators the
/// tokenizer understands. `^` already is the power operator.
pub fn substitute_symbols(expr: &str) -> String {
    expr.chars()
        .map(|c| match c {
            '×' => '*',
            '÷' => '/',
            '−' => '-',
            _ => c,
        })
        .collect()
}

/// Rewrites every postfix `!` into a `factorial(...)` call.
///
/// The operand is the run of digits before the `!`, optionally preceded by one
/// balanced parenthesised group. A group directly preceded by a name is a call
/// and the name belongs to the operand, so `sqrt(4)!` becomes
/// `factorial(sqrt(4))` and `2!!` becomes `factorial(factorial(2))`.
pub fn rewrite_factorials(expr: &str) -> String {
    let mut chars: Vec<char> = expr.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '!' {
            i += 1;
            continue;
        }

        let start = factorial_operand_start(&chars[..i]);
        let operand: String = chars[start..i].iter().collect();
        let replacement: Vec<char> = format!("factorial({})", operand).chars().collect();
        let resume = start + replacement.len();
        chars.splice(start..=i, replacement);
        // continue right after the inserted ')'
        i = resume;
    }

    let rewritten: String = chars.into_iter().collect();
    trace!(input = expr, rewritten = %rewritten, "factorial rewrite");
    rewritten
}

fn factorial_operand_start(head: &[char]) -> usize {
    let mut j = head.len();
    while j > 0 && head[j - 1].is_ascii_digit() {
        j -= 1;
    }

    if j == 0 || head[j - 1] != ')' {
        return j;
    }

    let mut balance = 0usize;
    while j > 0 {
        j -= 1;
        match head[j] {
            ')' => balance += 1,
            '(' => {
                balance -= 1;
                if balance == 0 {
                    break;
                }
            }
            _ => {}
        }
    }

    let mut k = j;
    while k > 0 && (head[k - 1].is_ascii_alphanumeric() || head[k - 1] == '_') {
        k -= 1;
    }
    if k < j && head[k].is_ascii_alphabetic() {
        k
    } else {
        j
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '(' => {
                tokens.push(Token::LParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RParen);
                chars.next();
            }
            ',' => {
                tokens.push(Token::Comma);
                chars.next();
            }
            '+' | '-' | '*' | '/' | '^' => {
                tokens.push(Token::Op(c));
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut num_str = String::new();
                let mut has_dot = false;
                let mut has_exp = false;

                while let Some(&ch) = chars.peek() {
                    match ch {
                        '.' if has_dot || has_exp => break,
                        '.' => {
                            has_dot = true;
                            num_str.push(ch);
                            chars.next();
                        }
                        'e' | 'E' if !has_exp && starts_exponent(chars.clone()) => {
                            has_exp = true;
                            num_str.push(ch);
                            chars.next();

                            if let Some(&sign) = chars.peek() {
                                if sign == '+' || sign == '-' {
                                    num_str.push(sign);
                                    chars.next();
                                }
                            }
                        }
                        '0'..='9' => {
                            num_str.push(ch);
                            chars.next();
                        }
                        _ => break,
                    }
                }

                let exact = if has_dot || has_exp { None } else { num_str.parse::<i128>().ok() };
                let value = match exact {
                    Some(n) => Value::Int(n),
                    None => num_str
                        .parse::<f64>()
                        .map(Value::Float)
                        .map_err(|_| EvalError::calc(format!("Invalid number: '{}'", num_str)))?,
                };
                tokens.push(Token::Number(value));
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                let mut ident = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_ascii_alphanumeric() || ch == '_' {
                        ident.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            _ => return Err(EvalError::calc(format!("Unknown character: '{}'", c))),
        }
    }
    Ok(tokens)
}

/// `e`/`E` only opens an exponent when a digit follows, optionally after a sign.
/// Otherwise it is left for the identifier rule (`2e` is `2` then `e`).
fn starts_exponent(mut ahead: impl Iterator<Item = char>) -> bool {
    ahead.next();
    match ahead.next() {
        Some('+') | Some('-') => matches!(ahead.next(), Some(d) if d.is_ascii_digit()),
        Some(d) => d.is_ascii_digit(),
        None => false,
    }
}

/// Recursive-descent evaluator over the calculator grammar:
///
/// ```text
/// expr    := term (('+' | '-') term)*
/// term    := unary (('*' | '/') unary)*
/// unary   := ('+' | '-') unary | power
/// power   := primary ('^' unary)?
/// primary := number | '(' expr ')' | name | name '(' args ')'
/// ```
///
/// `^` is right associative and binds tighter than a leading minus,
/// so `-2^2` is `-4` and `2^-1` is `0.5`. Every nesting level passes through
/// `unary`, which is where the depth bound is enforced.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, current: 0, depth: 0 }
    }

    pub fn parse(&mut self) -> Result<Value, EvalError> {
        let result = self.expr()?;
        if self.current < self.tokens.len() {
            return Err(EvalError::calc("Unexpected tokens at end of expression"));
        }
        Ok(result)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    fn expr(&mut self) -> Result<Value, EvalError> {
        let mut left = self.term()?;

        loop {
            match self.peek() {
                Some(Token::Op('+')) => {
                    self.current += 1;
                    left = left.add(self.term()?);
                }
                Some(Token::Op('-')) => {
                    self.current += 1;
                    left = left.sub(self.term()?);
                }
                _ => break,
            }
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<Value, EvalError> {
        let mut left = self.unary()?;

        loop {
            match self.peek() {
                Some(Token::Op('*')) => {
                    self.current += 1;
                    left = left.mul(self.unary()?);
                }
                Some(Token::Op('/')) => {
                    self.current += 1;
                    left = left.div(self.unary()?)?;
                }
                _ => break,
            }
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Value, EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EvalError::calc("expression nested too deeply"));
        }

        let value = match self.peek() {
            Some(Token::Op('+')) => {
                self.current += 1;
                self.unary()
            }
            Some(Token::Op('-')) => {
                self.current += 1;
                self.unary().map(Value::neg)
            }
            _ => self.power(),
        };

        self.depth -= 1;
        value
    }

    fn power(&mut self) -> Result<Value, EvalError> {
        let base = self.primary()?;

        if self.peek() != Some(&Token::Op('^')) {
            return Ok(base);
        }
        self.current += 1;
        let exponent = self.unary()?;
        base.pow(exponent)
    }

    fn primary(&mut self) -> Result<Value, EvalError> {
        let token = self
            .tokens
            .get(self.current)
            .ok_or_else(|| EvalError::calc("Unexpected end of input"))?;

        match token {
            Token::Number(n) => {
                let n = *n;
                self.current += 1;
                Ok(n)
            }
            Token::LParen => {
                self.current += 1;
                let value = self.expr()?;
                self.expect_rparen("Missing closing parenthesis")?;
                Ok(value)
            }
            Token::Ident(ident) => {
                let name = ident.clone();
                self.current += 1;

                if self.peek() != Some(&Token::LParen) {
                    return match name.as_str() {
                        "pi" => Ok(Value::Float(PI)),
                        "e" => Ok(Value::Float(E)),
                        _ if FUNCTIONS.contains(&name.as_str()) => {
                            Err(EvalError::calc(format!("Function '{}' requires parentheses", name)))
                        }
                        _ => Err(EvalError::calc(format!("Unknown identifier: '{}'", name))),
                    };
                }
                if !FUNCTIONS.contains(&name.as_str()) {
                    return Err(EvalError::calc(format!("Unknown function: '{}'", name)));
                }
                self.current += 1;

                let args = self.arguments()?;
                if args.len() != 1 {
                    return Err(EvalError::calc(format!(
                        "{}() takes exactly one argument ({} given)",
                        name,
                        args.len()
                    )));
                }
                apply_function(&name, args[0])
            }
            _ => Err(EvalError::calc("Unexpected token")),
        }
    }

    /// Parses a comma separated argument list after the opening parenthesis,
    /// consuming the closing one.
    fn arguments(&mut self) -> Result<Vec<Value>, EvalError> {
        let mut args = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            self.current += 1;
            return Ok(args);
        }

        loop {
            args.push(self.expr()?);
            match self.peek() {
                Some(Token::Comma) => self.current += 1,
                Some(Token::RParen) => {
                    self.current += 1;
                    return Ok(args);
                }
                Some(_) => return Err(EvalError::calc("Expected comma or closing parenthesis")),
                None => return Err(EvalError::calc("Missing closing parenthesis for function")),
            }
        }
    }

    fn expect_rparen(&mut self, message: &str) -> Result<(), EvalError> {
        if self.peek() == Some(&Token::RParen) {
            self.current += 1;
            Ok(())
        } else {
            Err(EvalError::calc(message))
        }
    }
}

fn apply_function(name: &str, arg: Value) -> Result<Value, EvalError> {
    if name == "factorial" {
        return factorial(arg);
    }

    let x = arg.as_f64();
    let value = match name {
        "sin" => x.sin(),
        "cos" => x.cos(),
        "tan" => x.tan(),
        "sqrt" => {
            if x < 0.0 {
                return Err(EvalError::calc("sqrt domain: non-negative numbers"));
            }
            x.sqrt()
        }
        "log" => {
            if x <= 0.0 {
                return Err(EvalError::calc("log domain: positive numbers"));
            }
            x.ln()
        }
        "log10" => {
            if x <= 0.0 {
                return Err(EvalError::calc("log10 domain: positive numbers"));
            }
            x.log10()
        }
        _ => return Err(EvalError::calc(format!("Unknown function: '{}'", name))),
    };
    Ok(Value::Float(value))
}

/// Exact while the product fits in an `i128` (up to `33!`), then `f64` up to
/// `170!`.
fn factorial(arg: Value) -> Result<Value, EvalError> {
    let n = match arg {
        Value::Int(n) => n,
        Value::Float(x) => {
            if x.fract() != 0.0 {
                return Err(EvalError::calc("Factorial requires integer argument"));
            }
            if x.abs() > MAX_FACTORIAL as f64 {
                return Err(EvalError::calc(format!("{}! is out of range", x)));
            }
            x as i128
        }
    };
    if n < 0 {
        return Err(EvalError::calc("Factorial not defined for negative numbers"));
    }
    if n > MAX_FACTORIAL {
        return Err(EvalError::calc(format!("{}! overflows", n)));
    }

    match (1..=n).try_fold(1i128, |acc, i| acc.checked_mul(i)) {
        Some(exact) => Ok(Value::Int(exact)),
        None => Ok(Value::Float((1..=n).fold(1.0, |acc, i| acc * i as f64))),
    }
}

/// Symbol substitution followed by the factorial rewrite: the text the
/// tokenizer actually sees.
pub fn prepare_expression(input: &str) -> String {
    rewrite_factorials(&substitute_symbols(input))
}

/// Evaluates an expression whose parentheses are already closed.
pub fn evaluate_expression(input: &str) -> Result<Value, EvalError> {
    let expr = prepare_expression(input);
    let outcome = evaluate_prepared(&expr);

    match &outcome {
        Ok(value) => debug!(rewritten = %expr, ?value, "evaluated"),
        Err(err) => debug!(rewritten = %expr, reason = err.reason(), "evaluation failed"),
    }
    outcome
}

fn evaluate_prepared(expr: &str) -> Result<Value, EvalError> {
    let tokens = tokenize(expr)?;
    let value = Parser::new(tokens).parse()?;

    if !value.as_f64().is_finite() {
        return Err(EvalError::calc("Result is not a finite number"));
    }
    Ok(value)
}

/// Renders a result the way the display shows it.
///
/// Exact integers print every digit. Floats use scientific notation at very
/// large and very small magnitudes (`1e+20`, `1.5e-07`); plain decimals lose
/// trailing zeros and a dangling point.
pub fn format_result(value: Value) -> String {
    match value {
        Value::Int(n) => n.to_string(),
        Value::Float(x) => format_float(x),
    }
}

fn format_float(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e16 || magnitude < 1e-4 {
        return scientific(value);
    }

    strip_trailing_zeros(&value.to_string()).to_string()
}

fn scientific(value: f64) -> String {
    let text = format!("{:e}", value);
    match text.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        None => text,
    }
}

/// `3.50` → `3.5`, `4.00` → `4`. Text without a point is returned as is.
pub fn strip_trailing_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn eval(input: &str) -> Result<String, EvalError> {
        evaluate_expression(input).map(format_result)
    }

    #[test_case("3!" => "factorial(3)"; "digits")]
    #[test_case("12!+1" => "factorial(12)+1"; "multi digit")]
    #[test_case("(2+1)!" => "factorial((2+1))"; "group")]
    #[test_case("((1+1)*2)!" => "factorial(((1+1)*2))"; "nested group")]
    #[test_case("2!!" => "factorial(factorial(2))"; "consecutive")]
    #[test_case("sqrt(4)!" => "factorial(sqrt(4))"; "call")]
    #[test_case("log10(100)!" => "factorial(log10(100))"; "call with digits in name")]
    #[test_case("3!*4!" => "factorial(3)*factorial(4)"; "two operands")]
    #[test_case("2.5!" => "2.factorial(5)"; "decimal keeps only digit run")]
    #[test_case("!" => "factorial()"; "empty operand")]
    #[test_case("1+2" => "1+2"; "untouched")]
    fn factorial_rewrite(input: &str) -> String {
        rewrite_factorials(input)
    }

    #[test]
    fn substitutes_keypad_glyphs() {
        assert_eq!(substitute_symbols("6×2÷3−1"), "6*2/3-1");
        assert_eq!(substitute_symbols("2^10"), "2^10");
    }

    #[test]
    fn tokenizes_exponent_only_before_digits() {
        assert_eq!(tokenize("1e-07").unwrap(), vec![Token::Number(Value::Float(1e-7))]);
        assert_eq!(
            tokenize("2e").unwrap(),
            vec![Token::Number(Value::Int(2)), Token::Ident("e".to_string())]
        );
        assert_eq!(
            tokenize("2e+x").unwrap(),
            vec![
                Token::Number(Value::Int(2)),
                Token::Ident("e".to_string()),
                Token::Op('+'),
                Token::Ident("x".to_string())
            ]
        );
    }

    #[test]
    fn tokenizes_integer_literals_exactly() {
        assert_eq!(
            tokenize("9007199254740993").unwrap(),
            vec![Token::Number(Value::Int(9_007_199_254_740_993))]
        );
        assert_eq!(tokenize("05").unwrap(), vec![Token::Number(Value::Int(5))]);
        assert_eq!(tokenize("5.").unwrap(), vec![Token::Number(Value::Float(5.0))]);
    }

    #[test]
    fn prepared_text_has_glyphs_and_factorials_rewritten() {
        assert_eq!(prepare_expression("6×3!"), "6*factorial(3)");
        assert_eq!(prepare_expression("(2+1)!÷2"), "factorial((2+1))/2");
    }

    #[test]
    fn rejects_unknown_characters() {
        assert!(matches!(tokenize("2 $ 3"), Err(EvalError::Calculation(_))));
    }

    #[test_case("3!" => Ok("6".to_string()); "simple factorial")]
    #[test_case("(2+1)!" => Ok("6".to_string()); "group factorial")]
    #[test_case("2!!" => Ok("2".to_string()); "double factorial of two")]
    #[test_case("3!!" => Ok("720".to_string()); "double factorial of three")]
    #[test_case("-3!" => Ok("-6".to_string()); "negated factorial")]
    #[test_case("0!" => Ok("1".to_string()); "zero factorial")]
    #[test_case("2^10" => Ok("1024".to_string()); "power")]
    #[test_case("2^3^2" => Ok("512".to_string()); "power is right associative")]
    #[test_case("-2^2" => Ok("-4".to_string()); "power binds tighter than minus")]
    #[test_case("2^-1" => Ok("0.5".to_string()); "negative exponent")]
    #[test_case("3.5+2.5" => Ok("6".to_string()); "trailing point stripped")]
    #[test_case("1+2*3" => Ok("7".to_string()); "precedence")]
    #[test_case("(1+2)*3" => Ok("9".to_string()); "parentheses")]
    #[test_case("5--3" => Ok("8".to_string()); "double minus")]
    #[test_case("7/2" => Ok("3.5".to_string()); "true division")]
    #[test_case("0.1+0.2" => Ok("0.30000000000000004".to_string()); "shortest repr")]
    #[test_case("sqrt(16)" => Ok("4".to_string()); "sqrt")]
    #[test_case("log10(1000)" => Ok("3".to_string()); "log10")]
    #[test_case("log(e)" => Ok("1".to_string()); "natural log")]
    #[test_case("sin(0)" => Ok("0".to_string()); "sine")]
    #[test_case("cos(pi)" => Ok("-1".to_string()); "cosine in radians")]
    #[test_case("sqrt(4)!" => Ok("2".to_string()); "factorial of a call")]
    #[test_case("10^20" => Ok("100000000000000000000".to_string()); "large integer power")]
    #[test_case("10.0^20" => Ok("1e+20".to_string()); "large float power")]
    #[test_case("9007199254740993" => Ok("9007199254740993".to_string()); "integer beyond f64 precision")]
    #[test_case("12345678901234567" => Ok("12345678901234567".to_string()); "seventeen digits")]
    #[test_case("10000000000000000" => Ok("10000000000000000".to_string()); "no exponent for integers")]
    #[test_case("9007199254740993+0" => Ok("9007199254740993".to_string()); "exact addition")]
    #[test_case("99999999999*99999999999" => Ok("9999999999800000000001".to_string()); "exact product")]
    #[test_case("2^100" => Ok("1267650600228229401496703205376".to_string()); "exact power")]
    #[test_case("25!" => Ok("15511210043330985984000000".to_string()); "exact factorial")]
    #[test_case("170141183460469231731687303715884105727+1" => Ok("1.7014118346046923e+38".to_string()); "integer overflow falls back to float")]
    #[test_case("6/3" => Ok("2".to_string()); "division is real")]
    #[test_case("1/10000000" => Ok("1e-07".to_string()); "small result")]
    #[test_case("1e+20/10" => Ok("1e+19".to_string()); "scientific input")]
    fn evaluates(input: &str) -> Result<String, EvalError> {
        eval(input)
    }

    #[test_case("5/0"; "integer")]
    #[test_case("1/(2-2)"; "computed zero")]
    #[test_case("0^-1"; "zero to negative power")]
    fn division_by_zero(input: &str) {
        assert_eq!(eval(input), Err(EvalError::DivisionByZero));
    }

    #[test_case("sqrt(-1)"; "negative sqrt")]
    #[test_case("log(0)"; "log of zero")]
    #[test_case("log10(-5)"; "log10 of negative")]
    #[test_case("2.5!"; "decimal factorial")]
    #[test_case("factorial(-1)"; "negative factorial")]
    #[test_case("171!"; "factorial overflow")]
    #[test_case("foo(2)"; "unknown function")]
    #[test_case("x+1"; "unknown identifier")]
    #[test_case("sin"; "function without call")]
    #[test_case("sqrt(4, 9)"; "too many arguments")]
    #[test_case("factorial()"; "no arguments")]
    #[test_case("1.2.3"; "two decimal points")]
    #[test_case("2(3)"; "implicit multiplication")]
    #[test_case("(1+2"; "unclosed")]
    #[test_case("1+"; "dangling operator")]
    #[test_case("(-8)^(1/3)"; "complex power")]
    #[test_case("10^400"; "overflow")]
    #[test_case(&("(".repeat(10_000) + "1"); "deeply nested groups")]
    #[test_case(&("-".repeat(10_000) + "1"); "long sign chain")]
    #[test_case(&("sin(".repeat(10_000) + "1" + &")".repeat(10_000)); "deeply nested calls")]
    #[test_case(&("2^".repeat(10_000) + "1"); "long exponent chain")]
    fn calculation_errors(input: &str) {
        let outcome = eval(input);
        assert!(matches!(outcome, Err(EvalError::Calculation(_))), "{}: {:?}", input, outcome);
    }

    #[test]
    fn moderate_nesting_still_evaluates() {
        let input = "(".repeat(100) + "1" + &")".repeat(100);
        assert_eq!(eval(&input), Ok("1".to_string()));
        assert_eq!(eval(&("-".repeat(100) + "1")), Ok("1".to_string()));
    }

    #[test]
    fn depth_error_names_the_cause() {
        let err = evaluate_expression(&("(".repeat(1_000) + "1")).unwrap_err();
        assert_eq!(err.reason(), "expression nested too deeply");
    }

    #[test_case(Value::Int(-42) => "-42"; "integer")]
    #[test_case(Value::Float(5.0) => "5"; "whole")]
    #[test_case(Value::Float(-0.0) => "0"; "negative zero")]
    #[test_case(Value::Float(3.25) => "3.25"; "fraction")]
    #[test_case(Value::Float(123456789012345.0) => "123456789012345"; "below scientific threshold")]
    #[test_case(Value::Float(2.5e20) => "2.5e+20"; "scientific keeps mantissa")]
    fn formats(value: Value) -> String {
        format_result(value)
    }

    #[test]
    fn strips_zeros_only_after_point() {
        assert_eq!(strip_trailing_zeros("3.50"), "3.5");
        assert_eq!(strip_trailing_zeros("4.00"), "4");
        assert_eq!(strip_trailing_zeros("100"), "100");
    }
}
