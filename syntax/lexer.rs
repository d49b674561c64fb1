//! Tokenize a string representation of a program.

use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, tag, take_while},
    character::complete::{alpha1, alphanumeric1, char, digit1, multispace1, none_of},
    combinator::{map, map_res, recognize, value},
    multi::{many0, many0_count},
    sequence::{delimited, pair},
    IResult, InputLength,
};

use crate::{Location, ParseError, Symbol};

/// Lexical element of a program.
/// Named after how they look, not what they mean.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum TokenKind {
    Symbol(Symbol),
    Variable(Symbol),
    String(String),
    Integer(i64),
    Infimum,
    Supremum,
    True,
    False,
    Show,
    External,
    Not,
    If,
    DotDot,
    Dot,
    Comma,
    Colon,
    Semi,
    At,
    Plus,
    Dash,
    StarStar,
    Star,
    Slash,
    Backslash,
    Caret,
    Amp,
    Query,
    Tilde,
    Bar,
    Eq,
    Ne,
    Leq,
    Geq,
    Lt,
    Gt,
    LParen,
    RParen,
    LBrace,
    RBrace,
}

/// A token with the location where it began.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: Location,
}

impl Token {
    pub fn new(kind: TokenKind, location: Location) -> Self {
        Self { kind, location }
    }
}

impl InputLength for Token {
    #[inline]
    fn input_len(&self) -> usize {
        1
    }
}

/// A token paired with the input at which it began,
/// prior to location assignment.
type RawToken<'a> = (TokenKind, &'a str);

fn comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(char('%'), take_while(|c| c != '\n')))(input)
}

fn space(input: &str) -> IResult<&str, &str> {
    recognize(many0_count(alt((multispace1, comment))))(input)
}

fn symbol(input: &str) -> IResult<&str, Symbol> {
    let (input, name) = recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))(input)?;
    Ok((input, Symbol::new(name.to_owned())))
}

// TODO: remove when escaped_transform handles opt(..).
// Needs investigation, probably related to nom#{1118,1336}.
fn empty_string(input: &str) -> IResult<&str, String> {
    map(tag(r#""""#), |_| String::new())(input)
}

fn quoted_string(input: &str) -> IResult<&str, String> {
    delimited(
        char('"'),
        escaped_transform(
            none_of(r#"\""#),
            '\\',
            alt((
                value("\\", tag("\\")),
                value("\"", tag("\"")),
                value("\n", tag("n")),
                value("\r", tag("r")),
                value("\t", tag("t")),
            )),
        ),
        char('"'),
    )(input)
}

fn string(input: &str) -> IResult<&str, String> {
    alt((empty_string, quoted_string))(input)
}

fn integer(input: &str) -> IResult<&str, i64> {
    map_res(digit1, |digits: &str| digits.parse::<i64>())(input)
}

fn token<'a, F>(mut parser: F) -> impl FnMut(&'a str) -> IResult<&'a str, RawToken<'a>>
where
    F: FnMut(&'a str) -> IResult<&'a str, TokenKind>,
{
    move |input: &'a str| {
        let at = input;
        let (input, kind) = parser(input)?;
        Ok((input, (kind, at)))
    }
}

/// Define a parser combinator for a token denoted by a tag.
/// Adapted from Monkey's `syntax!` macro.
macro_rules! lex_token {
    ($function: ident, $tag: literal, $kind: ident) => {
        fn $function(input: &str) -> IResult<&str, RawToken<'_>> {
            token(map(tag($tag), |_| TokenKind::$kind))(input)
        }
    };
}

lex_token!(infimum, "#inf", Infimum);
lex_token!(supremum, "#sup", Supremum);
lex_token!(r#true, "#true", True);
lex_token!(r#false, "#false", False);
lex_token!(show, "#show", Show);
lex_token!(external, "#external", External);
lex_token!(r#if, ":-", If);
lex_token!(dotdot, "..", DotDot);
lex_token!(dot, ".", Dot);
lex_token!(comma, ",", Comma);
lex_token!(colon, ":", Colon);
lex_token!(semi, ";", Semi);
lex_token!(at, "@", At);
lex_token!(plus, "+", Plus);
lex_token!(dash, "-", Dash);
lex_token!(starstar, "**", StarStar);
lex_token!(star, "*", Star);
lex_token!(slash, "/", Slash);
lex_token!(backslash, "\\", Backslash);
lex_token!(caret, "^", Caret);
lex_token!(amp, "&", Amp);
lex_token!(query, "?", Query);
lex_token!(tilde, "~", Tilde);
lex_token!(bar, "|", Bar);
lex_token!(eq, "=", Eq);
lex_token!(leq, "<=", Leq);
lex_token!(geq, ">=", Geq);
lex_token!(lt, "<", Lt);
lex_token!(gt, ">", Gt);
lex_token!(lparen, "(", LParen);
lex_token!(rparen, ")", RParen);
lex_token!(lbrace, "{", LBrace);
lex_token!(rbrace, "}", RBrace);

fn ne(input: &str) -> IResult<&str, RawToken<'_>> {
    token(map(alt((tag("!="), tag("<>"))), |_| TokenKind::Ne))(input)
}

/// Keywords are split off after the whole word is read, so that
/// a name like `notation` never sheds a `not` prefix. Leading
/// underscores do not decide between variables and symbols:
/// `_X` is a variable, `_x` a symbol, `_` alone anonymous.
fn word(input: &str) -> IResult<&str, RawToken<'_>> {
    token(map(symbol, |s| {
        if s.name() == "not" {
            return TokenKind::Not;
        }
        let bare = s.name().trim_start_matches('_');
        if bare.starts_with(|c: char| c.is_uppercase()) || bare.is_empty() {
            TokenKind::Variable(s)
        } else {
            TokenKind::Symbol(s)
        }
    }))(input)
}

fn raw_tokens(input: &str) -> IResult<&str, Vec<RawToken<'_>>> {
    many0(delimited(
        space,
        alt((
            alt((infimum, supremum, r#true, r#false, show, external)),
            alt((r#if, dotdot, dot, comma, colon, semi, at)),
            alt((ne, leq, geq, eq, lt, gt)),
            alt((
                starstar, star, plus, dash, slash, backslash, caret, amp, query, tilde, bar,
            )),
            alt((lparen, rparen, lbrace, rbrace)),
            token(map(integer, TokenKind::Integer)),
            token(map(string, TokenKind::String)),
            word,
        )),
        space,
    ))(input)
}

/// Assign 1-based line and column numbers to ascending byte
/// offsets in a single pass. Columns count characters.
fn locations(input: &str, offsets: impl IntoIterator<Item = usize>) -> Vec<Location> {
    let mut located = Vec::new();
    let mut offsets = offsets.into_iter().peekable();
    let mut line = 1;
    let mut column = 1;
    for (i, c) in input.char_indices() {
        while offsets.peek() == Some(&i) {
            located.push(Location::new(line, column));
            offsets.next();
        }
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    for _ in offsets {
        located.push(Location::new(line, column));
    }
    located
}

fn location_at(input: &str, offset: usize) -> Location {
    locations(input, [offset]).pop().unwrap_or_default()
}

/// Tokenize a string representation of a program. Each token
/// is tagged with the line and column where it began; an
/// unreadable character fails with its location.
pub fn lex(input: &str) -> Result<Vec<Token>, ParseError> {
    let truncated = |_| ParseError::new(Location::default(), String::from("truncated program"));
    let (rest, raw) = raw_tokens(input).map_err(truncated)?;
    let (rest, _) = space(rest).map_err(truncated)?;
    if let Some(c) = rest.chars().next() {
        return Err(ParseError::new(
            location_at(input, input.len() - rest.len()),
            format!("unexpected character {c:?}"),
        ));
    }
    let offsets = raw.iter().map(|(_, at)| input.len() - at.len());
    let located = locations(input, offsets.collect::<Vec<_>>());
    Ok(raw
        .into_iter()
        .zip(located)
        .map(|((kind, _), location)| Token::new(kind, location))
        .collect())
}

#[cfg(test)]
mod test {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        lex(input)
            .expect("lexable program")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn symbol() {
        assert!(super::symbol("").is_err(), "empty");
        assert!(super::symbol("123").is_err(), "symbol starts with a digit");
        assert_eq!(
            super::symbol("_123"),
            Ok(("", Symbol::new(String::from("_123")))),
            "symbol starts with an underscore"
        );
        assert_eq!(
            super::symbol("foo_123"),
            Ok(("", Symbol::new(String::from("foo_123")))),
            "symbol includes an underscore"
        );
    }

    #[test]
    fn string() {
        assert!(super::string(r#""#).is_err(), "empty");
        assert!(super::string(r#""foo"#).is_err(), "unterminated string");
        assert_eq!(
            super::string(r#""""#),
            Ok(("", String::new())),
            "empty string"
        );
        assert_eq!(
            super::string(r#""foo bar""#),
            Ok(("", String::from("foo bar"))),
            "simple string"
        );
        assert_eq!(
            super::string(r#""Foo:\r\n\t\"Foo\\!\"""#),
            Ok(("", String::from("Foo:\r\n\t\"Foo\\!\""))),
            "backslash escapes"
        );
    }

    #[test]
    fn integer() {
        assert!(super::integer("").is_err(), "empty");
        assert!(super::integer("X").is_err(), "invalid");
        assert!(super::integer("12345678901234567890").is_err(), "big");
        assert_eq!(super::integer("0"), Ok(("", 0)), "zero");
        assert_eq!(super::integer("123456"), Ok(("", 123456)), "decimal");
    }

    #[test]
    fn words() {
        use TokenKind::*;
        assert_eq!(
            kinds("p X _x _X _ not notation"),
            vec![
                Symbol("p".into()),
                Variable("X".into()),
                Symbol("_x".into()),
                Variable("_X".into()),
                Variable("_".into()),
                Not,
                Symbol("notation".into()),
            ]
        );
    }

    #[test]
    fn rules() {
        use TokenKind::*;
        assert_eq!(
            kinds("p(X) :- q(X), X > 2."),
            vec![
                Symbol("p".into()),
                LParen,
                Variable("X".into()),
                RParen,
                If,
                Symbol("q".into()),
                LParen,
                Variable("X".into()),
                RParen,
                Comma,
                Variable("X".into()),
                Gt,
                Integer(2),
                Dot,
            ]
        );
        assert_eq!(
            kinds("{p(1..3)}."),
            vec![
                LBrace,
                Symbol("p".into()),
                LParen,
                Integer(1),
                DotDot,
                Integer(3),
                RParen,
                RBrace,
                Dot,
            ]
        );
    }

    #[test]
    fn directives() {
        use TokenKind::*;
        assert_eq!(
            kinds("#show p/2. #external q/0."),
            vec![
                Show,
                Symbol("p".into()),
                Slash,
                Integer(2),
                Dot,
                External,
                Symbol("q".into()),
                Slash,
                Integer(0),
                Dot,
            ]
        );
        assert_eq!(
            kinds("#inf #sup #true #false"),
            vec![Infimum, Supremum, True, False]
        );
    }

    #[test]
    fn operators() {
        use TokenKind::*;
        assert_eq!(
            kinds("1 + 2 - 3 * 4 / 5 \\ 6 ** 7"),
            vec![
                Integer(1),
                Plus,
                Integer(2),
                Dash,
                Integer(3),
                Star,
                Integer(4),
                Slash,
                Integer(5),
                Backslash,
                Integer(6),
                StarStar,
                Integer(7),
            ]
        );
        assert_eq!(
            kinds("X != 1, X <> 2, X <= 3, X >= 4"),
            vec![
                Variable("X".into()),
                Ne,
                Integer(1),
                Comma,
                Variable("X".into()),
                Ne,
                Integer(2),
                Comma,
                Variable("X".into()),
                Leq,
                Integer(3),
                Comma,
                Variable("X".into()),
                Geq,
                Integer(4),
            ]
        );
        assert_eq!(kinds("@f(|X|)").first(), Some(&At));
    }

    #[test]
    fn comments() {
        assert_eq!(kinds(""), vec![], "nothing");
        assert_eq!(kinds("  \n "), vec![], "space");
        assert_eq!(kinds("% a comment"), vec![], "only a comment");
        assert_eq!(
            kinds("p. % p holds\nq."),
            vec![
                TokenKind::Symbol("p".into()),
                TokenKind::Dot,
                TokenKind::Symbol("q".into()),
                TokenKind::Dot,
            ]
        );
    }

    #[test]
    fn located() {
        let tokens = lex("p.\n  q.").expect("lexable program");
        let locations = tokens
            .iter()
            .map(|t| (t.location.line, t.location.column))
            .collect::<Vec<_>>();
        assert_eq!(locations, vec![(1, 1), (1, 2), (2, 3), (2, 4)]);
    }

    #[test]
    fn unreadable() {
        let err = lex("p :- q.\n  $!").expect_err("unreadable character");
        assert_eq!(err.location, Location::new(2, 3));
        assert!(err.message.contains('$'));
    }
}
