//! Parse a stream of tokens as a program.
//!
//! Pratt-style precedence parsing based on Monkey's
//! `parse_pratt_expr` and related routines.

use nom::{
    branch::alt,
    bytes::complete::take,
    combinator::{cut, eof, map, opt, success, verify},
    error::{Error, ErrorKind},
    multi::{many0, separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
    Err, IResult,
};

use crate::{
    Aggregate, AggregateBounds, BinOp, ConditionalLiteral, Head, HeadKind, Literal, LiteralKind,
    Location, ParseError, RelOp, Rule, Sign, Signature, Statement, Symbol, Term, TermKind,
    TokenKind, Tokens, UnaryOp,
};

/// Parse a string representation of a program into a statement
/// stream. A `#show` directive with several signatures becomes
/// one statement per signature.
pub fn parse_program(input: &str) -> Result<Vec<Statement>, ParseError> {
    let tokens = crate::lex(input)?;
    let end = tokens.last().map(|t| t.location).unwrap_or_default();
    match program(Tokens::new(&tokens)) {
        Ok((_, statements)) => Ok(statements),
        Err(Err::Error(e) | Err::Failure(e)) => Err(ParseError::new(
            e.input.location().unwrap_or(end),
            "syntax error",
        )),
        Err(Err::Incomplete(_)) => Err(ParseError::new(end, "truncated program")),
    }
}

fn program(input: Tokens<'_>) -> IResult<Tokens<'_>, Vec<Statement>> {
    map(terminated(many0(statement), eof), |statements| {
        statements.into_iter().flatten().collect()
    })(input)
}

/// Define a parser combinator that recognizes a single token.
/// Named (mostly) after what they mean, not how they look.
/// Adapted from Monkey's `tag_token!` macro.
macro_rules! parse_token {
    ($function: ident, $kind: ident) => {
        fn $function(input: Tokens<'_>) -> IResult<Tokens<'_>, Tokens<'_>> {
            verify(take(1_usize), |t: &Tokens| {
                t.tok[0].kind == TokenKind::$kind
            })(input)
        }
    };
}

parse_token!(dotdot, DotDot);
parse_token!(dot, Dot);
parse_token!(comma, Comma);
parse_token!(colon, Colon);
parse_token!(semi, Semi);
parse_token!(at, At);
parse_token!(plus, Plus);
parse_token!(minus, Dash);
parse_token!(times, Star);
parse_token!(over, Slash);
parse_token!(modulo, Backslash);
parse_token!(exp, StarStar);
parse_token!(caret, Caret);
parse_token!(amp, Amp);
parse_token!(query, Query);
parse_token!(complement, Tilde);
parse_token!(abs, Bar);
parse_token!(eq, Eq);
parse_token!(ne, Ne);
parse_token!(lt, Lt);
parse_token!(gt, Gt);
parse_token!(leq, Leq);
parse_token!(geq, Geq);
parse_token!(lparen, LParen);
parse_token!(rparen, RParen);
parse_token!(lbrace, LBrace);
parse_token!(rbrace, RBrace);
parse_token!(not, Not);
parse_token!(r#if, If);
parse_token!(show, Show);
parse_token!(external, External);
parse_token!(r#true, True);
parse_token!(r#false, False);

fn symbol(input: Tokens<'_>) -> IResult<Tokens<'_>, (Symbol, Location)> {
    let (input, tokens) = take(1_usize)(input)?;
    if tokens.is_empty() {
        Err(Err::Error(Error::new(input, ErrorKind::Fail)))
    } else {
        match &tokens.tok[0].kind {
            TokenKind::Symbol(s) => Ok((input, (s.clone(), tokens.tok[0].location))),
            _ => Err(Err::Error(Error::new(input, ErrorKind::Fail))),
        }
    }
}

fn integer(input: Tokens<'_>) -> IResult<Tokens<'_>, i64> {
    let (input, tokens) = take(1_usize)(input)?;
    if tokens.is_empty() {
        Err(Err::Error(Error::new(input, ErrorKind::Fail)))
    } else {
        match tokens.tok[0].kind {
            TokenKind::Integer(i) => Ok((input, i)),
            _ => Err(Err::Error(Error::new(input, ErrorKind::Fail))),
        }
    }
}

/// A term consisting of a single token: a literal value,
/// `#inf`/`#sup`, or a variable.
fn leaf(input: Tokens<'_>) -> IResult<Tokens<'_>, Term> {
    let (input, tokens) = take(1_usize)(input)?;
    if tokens.is_empty() {
        return Err(Err::Error(Error::new(input, ErrorKind::Fail)));
    }
    let location = tokens.tok[0].location;
    let kind = match &tokens.tok[0].kind {
        TokenKind::Integer(i) => TermKind::Integer(*i),
        TokenKind::String(s) => TermKind::String(s.clone()),
        TokenKind::Infimum => TermKind::Infimum,
        TokenKind::Supremum => TermKind::Supremum,
        TokenKind::Variable(s) => TermKind::Variable(s.clone()),
        _ => return Err(Err::Error(Error::new(input, ErrorKind::Fail))),
    };
    Ok((input, Term::new(kind, location)))
}

/// One or more terms separated by semicolons: a single term,
/// or a pool of alternatives.
fn pooled_term(input: Tokens<'_>) -> IResult<Tokens<'_>, Term> {
    map(separated_list1(semi, term), |mut terms| {
        if terms.len() == 1 {
            terms.remove(0)
        } else {
            let location = terms[0].location;
            Term::new(TermKind::Pool(terms), location)
        }
    })(input)
}

fn parenthesized(input: Tokens<'_>) -> IResult<Tokens<'_>, Term> {
    delimited(lparen, pooled_term, rparen)(input)
}

fn arguments(input: Tokens<'_>) -> IResult<Tokens<'_>, Vec<Term>> {
    delimited(lparen, separated_list0(comma, pooled_term), rparen)(input)
}

fn function_or_constant(input: Tokens<'_>) -> IResult<Tokens<'_>, Term> {
    let (input, (name, location)) = symbol(input)?;
    let (input, args) = opt(arguments)(input)?;
    let kind = match args {
        Some(args) => TermKind::Function(name, args),
        None => TermKind::Constant(name),
    };
    Ok((input, Term::new(kind, location)))
}

fn external_function(input: Tokens<'_>) -> IResult<Tokens<'_>, Term> {
    let (input, tokens) = at(input)?;
    let location = tokens.tok[0].location;
    let (input, (name, _)) = symbol(input)?;
    let (input, args) = opt(arguments)(input)?;
    Ok((
        input,
        Term::new(
            TermKind::ExternalFunction(name, args.unwrap_or_default()),
            location,
        ),
    ))
}

fn unary_operation(input: Tokens<'_>) -> IResult<Tokens<'_>, Term> {
    use UnaryOp::*;
    alt((
        map(delimited(abs, term, abs), |t| Term::unary_operation(Abs, t)),
        map(preceded(minus, base_term), |t| {
            Term::unary_operation(Neg, t)
        }),
        map(preceded(complement, base_term), |t| {
            Term::unary_operation(Not, t)
        }),
    ))(input)
}

fn base_term(input: Tokens<'_>) -> IResult<Tokens<'_>, Term> {
    alt((
        unary_operation,
        parenthesized,
        external_function,
        function_or_constant,
        leaf,
    ))(input)
}

/// [Pratt style](https://en.wikipedia.org/wiki/Operator-precedence_parser#Pratt_parsing)
/// precedence parsing. Additive operators share a level so that
/// `1 - 2 + 3` associates left; likewise the multiplicative ones.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
enum Precedence {
    Lowest,
    Interval,
    Xor,
    Or,
    And,
    Additive,
    Multiplicative,
    Exponentiation,
}

impl Precedence {
    fn is_right_assoc(&self) -> bool {
        matches!(self, Precedence::Exponentiation)
    }
}

fn bin_op(input: Tokens<'_>) -> IResult<Tokens<'_>, (Precedence, Option<BinOp>)> {
    alt((
        map(dotdot, |_| (Precedence::Interval, None)),
        map(caret, |_| (Precedence::Xor, Some(BinOp::Xor))),
        map(query, |_| (Precedence::Or, Some(BinOp::Or))),
        map(amp, |_| (Precedence::And, Some(BinOp::And))),
        map(plus, |_| (Precedence::Additive, Some(BinOp::Add))),
        map(minus, |_| (Precedence::Additive, Some(BinOp::Sub))),
        map(exp, |_| (Precedence::Exponentiation, Some(BinOp::Exp))),
        map(times, |_| (Precedence::Multiplicative, Some(BinOp::Mul))),
        map(over, |_| (Precedence::Multiplicative, Some(BinOp::Div))),
        map(modulo, |_| (Precedence::Multiplicative, Some(BinOp::Rem))),
        success((Precedence::Lowest, None)),
    ))(input)
}

fn infix(input: Tokens<'_>, left: Term) -> IResult<Tokens<'_>, Term> {
    let (input, (precedence, bin_op)) = bin_op(input)?;
    match (precedence, bin_op) {
        (_, Some(op)) => {
            let (input, right) = pratt_left(input, precedence)?;
            Ok((input, Term::binary_operation(left, op, right)))
        }
        (Precedence::Interval, None) => {
            let (input, right) = pratt_left(input, precedence)?;
            Ok((input, Term::interval(left, right)))
        }
        (_, None) => Err(Err::Error(Error::new(input, ErrorKind::Fail))),
    }
}

fn pratt_right(input: Tokens<'_>, precedence: Precedence, left: Term) -> IResult<Tokens<'_>, Term> {
    let (_, (peek, _)) = bin_op(input)?;
    if peek > precedence || (peek == precedence && peek.is_right_assoc()) {
        let (input, left) = infix(input, left)?;
        pratt_right(input, precedence, left)
    } else {
        Ok((input, left))
    }
}

fn pratt_left(input: Tokens<'_>, precedence: Precedence) -> IResult<Tokens<'_>, Term> {
    let (input, left) = base_term(input)?;
    pratt_right(input, precedence, left)
}

fn term(input: Tokens<'_>) -> IResult<Tokens<'_>, Term> {
    pratt_left(input, Precedence::Lowest)
}

fn rel_op(input: Tokens<'_>) -> IResult<Tokens<'_>, RelOp> {
    alt((
        map(eq, |_| RelOp::Eq),
        map(ne, |_| RelOp::Ne),
        map(leq, |_| RelOp::Leq),
        map(geq, |_| RelOp::Geq),
        map(lt, |_| RelOp::Lt),
        map(gt, |_| RelOp::Gt),
    ))(input)
}

fn boolean(input: Tokens<'_>) -> IResult<Tokens<'_>, Literal> {
    alt((
        map(r#true, |t: Tokens| {
            Literal::new(Sign::None, LiteralKind::Boolean(true), t.tok[0].location)
        }),
        map(r#false, |t: Tokens| {
            Literal::new(Sign::None, LiteralKind::Boolean(false), t.tok[0].location)
        }),
    ))(input)
}

fn comparison(input: Tokens<'_>) -> IResult<Tokens<'_>, Literal> {
    map(tuple((term, rel_op, term)), |(l, op, r)| {
        let location = l.location;
        Literal::new(Sign::None, LiteralKind::Comparison(l, op, r), location)
    })(input)
}

/// An atom is syntactically just a term; the translation
/// insists on a symbolic constant or function application.
fn atom(input: Tokens<'_>) -> IResult<Tokens<'_>, Literal> {
    map(term, |t| {
        let location = t.location;
        Literal::new(Sign::None, LiteralKind::Atom(t), location)
    })(input)
}

fn bare_literal(input: Tokens<'_>) -> IResult<Tokens<'_>, Literal> {
    alt((boolean, comparison, atom))(input)
}

fn literal(input: Tokens<'_>) -> IResult<Tokens<'_>, Literal> {
    alt((
        map(pair(not, pair(not, bare_literal)), |(t, (_, mut lit))| {
            lit.sign = Sign::DoubleNegation;
            lit.location = t.tok[0].location;
            lit
        }),
        map(pair(not, bare_literal), |(t, mut lit)| {
            lit.sign = Sign::Negation;
            lit.location = t.tok[0].location;
            lit
        }),
        bare_literal,
    ))(input)
}

fn conditional_literal(input: Tokens<'_>) -> IResult<Tokens<'_>, ConditionalLiteral> {
    map(
        pair(
            literal,
            opt(preceded(colon, separated_list1(comma, literal))),
        ),
        |(l, condition)| ConditionalLiteral::new(l, condition.unwrap_or_default()),
    )(input)
}

fn choices(input: Tokens<'_>) -> IResult<Tokens<'_>, (Vec<ConditionalLiteral>, Location)> {
    let (input, open) = lbrace(input)?;
    let (input, elements) = cut(terminated(
        separated_list0(semi, conditional_literal),
        rbrace,
    ))(input)?;
    Ok((input, (elements, open.tok[0].location)))
}

fn choice_head(input: Tokens<'_>) -> IResult<Tokens<'_>, Head> {
    alt((
        map(
            tuple((term, choices, term)),
            |(lower, (elements, _), upper)| {
                let location = lower.location;
                Head::new(
                    HeadKind::Choice(Aggregate::new(
                        elements,
                        Some(AggregateBounds::new(lower, upper)),
                    )),
                    location,
                )
            },
        ),
        map(choices, |(elements, location)| {
            Head::new(HeadKind::Choice(Aggregate::new(elements, None)), location)
        }),
    ))(input)
}

fn head(input: Tokens<'_>) -> IResult<Tokens<'_>, Head> {
    alt((
        choice_head,
        map(literal, |l| {
            let location = l.location;
            Head::new(HeadKind::Literal(l), location)
        }),
    ))(input)
}

fn body(input: Tokens<'_>) -> IResult<Tokens<'_>, Vec<Literal>> {
    separated_list0(comma, literal)(input)
}

fn rule(input: Tokens<'_>) -> IResult<Tokens<'_>, Rule> {
    alt((
        map(
            tuple((head, r#if, cut(pair(body, dot)))),
            |(head, _, (body, _))| {
                let location = head.location;
                Rule::new(head, body, location)
            },
        ),
        map(pair(r#if, cut(pair(body, dot))), |(t, (body, _))| {
            let location = t.tok[0].location;
            Rule::new(Head::falsity(location), body, location)
        }),
        map(pair(head, cut(dot)), |(head, _)| {
            let location = head.location;
            Rule::new(head, [], location)
        }),
    ))(input)
}

fn signature(input: Tokens<'_>) -> IResult<Tokens<'_>, Signature> {
    let (input, (name, _)) = symbol(input)?;
    let (input, _) = over(input)?;
    let (input, arity) = integer(input)?;
    match usize::try_from(arity) {
        Ok(arity) => Ok((input, Signature::new(name, arity))),
        Err(_) => Err(Err::Error(Error::new(input, ErrorKind::Fail))),
    }
}

fn show_statement(input: Tokens<'_>) -> IResult<Tokens<'_>, Vec<Statement>> {
    let (input, tokens) = show(input)?;
    let location = tokens.tok[0].location;
    let (input, signatures) = cut(terminated(separated_list0(comma, signature), dot))(input)?;
    Ok((
        input,
        if signatures.is_empty() {
            vec![Statement::Show(None, location)]
        } else {
            signatures
                .into_iter()
                .map(|s| Statement::Show(Some(s), location))
                .collect()
        },
    ))
}

fn external_statement(input: Tokens<'_>) -> IResult<Tokens<'_>, Vec<Statement>> {
    let (input, tokens) = external(input)?;
    let location = tokens.tok[0].location;
    let (input, s) = cut(terminated(signature, dot))(input)?;
    Ok((input, vec![Statement::External(s, location)]))
}

fn statement(input: Tokens<'_>) -> IResult<Tokens<'_>, Vec<Statement>> {
    alt((
        show_statement,
        external_statement,
        map(rule, |r| vec![Statement::Rule(r)]),
    ))(input)
}
