// sorrel-core - String and pattern built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Strings and patterns: str, subs, upper-case, lower-case, replace,
//! replace-first, sb, sb-append, sb-reverse, re-pattern, re-find, re-seq,
//! re-iterate
//!
//! String indices count characters, not bytes.

use regex::{Captures, Regex};

use crate::context::Context;
use crate::error::{EvalError, Result};
use crate::eval::apply;
use crate::value::{Pattern, PrintStyle, StringBuilder, Value};

use super::{between, exact, expect_int, expect_str};

/// `(str x ...)`: the arguments printed without quoting; nil prints as
/// nothing.
pub(crate) fn builtin_str(args: &[Value]) -> Result<Value> {
    let out: String = args
        .iter()
        .filter(|arg| !arg.is_nil())
        .map(|arg| arg.render(PrintStyle::Raw))
        .collect();
    Ok(Value::string(out))
}

/// `(subs s start)` / `(subs s start end)`: the characters in
/// `[start, end)`.
pub(crate) fn builtin_subs(args: &[Value]) -> Result<Value> {
    between("subs", args, 2, 3)?;
    let text = expect_str("subs", &args[0])?;
    let len = text.chars().count();
    let index = |value: &Value| -> Result<(i64, usize)> {
        let n = expect_int("subs", value)?;
        match usize::try_from(n) {
            Ok(i) if i <= len => Ok((n, i)),
            _ => Err(EvalError::out_of_bounds("subs", n)),
        }
    };
    let (_, start) = index(&args[1])?;
    let end = match args.get(2) {
        Some(value) => {
            let (raw, end) = index(value)?;
            if end < start {
                return Err(EvalError::out_of_bounds("subs", raw));
            }
            end
        }
        None => len,
    };
    Ok(Value::string(
        text.chars().skip(start).take(end - start).collect::<String>(),
    ))
}

/// `(upper-case x)`: `x` printed as `str` would, upper-cased.
pub(crate) fn builtin_upper_case(args: &[Value]) -> Result<Value> {
    let [x] = exact::<1>("upper-case", args)?;
    Ok(Value::string(x.render(PrintStyle::Raw).to_uppercase()))
}

pub(crate) fn builtin_lower_case(args: &[Value]) -> Result<Value> {
    let [x] = exact::<1>("lower-case", args)?;
    Ok(Value::string(x.render(PrintStyle::Raw).to_lowercase()))
}

/// `(replace s match replacement)`: replace every occurrence of `match`.
///
/// A string match takes a string replacement and a character match takes a
/// character. A pattern match takes either a template string, where `$1`
/// names a group, or a function called with each match shaped as
/// `re-find` returns it.
pub(crate) fn builtin_replace(args: &[Value], ctx: &Context) -> Result<Value> {
    replace("replace", args, None, ctx)
}

pub(crate) fn builtin_replace_first(args: &[Value], ctx: &Context) -> Result<Value> {
    replace("replace-first", args, Some(1), ctx)
}

fn replace(
    origin: &'static str,
    args: &[Value],
    limit: Option<usize>,
    ctx: &Context,
) -> Result<Value> {
    let [text, needle, replacement] = exact::<3>(origin, args)?;
    let text = expect_str(origin, text)?;
    let literal = |from: &str, to: &str| match limit {
        Some(n) => text.replacen(from, to, n),
        None => text.replace(from, to),
    };

    let out = match (needle, replacement) {
        (Value::String(from), Value::String(to)) => literal(from, to),
        (Value::Char(from), Value::Char(to)) => {
            literal(from.encode_utf8(&mut [0; 4]), to.encode_utf8(&mut [0; 4]))
        }
        (Value::String(_), other) => {
            return Err(EvalError::type_error(origin, "a string replacement", other));
        }
        (Value::Char(_), other) => {
            return Err(EvalError::type_error(origin, "a character replacement", other));
        }
        (needle, replacement) => {
            let regex = expect_pattern(origin, needle)?.regex();
            match replacement {
                Value::String(template) => regex
                    .replacen(text, limit.unwrap_or(0), &**template)
                    .into_owned(),
                f => replace_with(origin, regex, text, limit, f, ctx)?,
            }
        }
    };
    Ok(Value::string(out))
}

/// Replace matches with whatever `f` returns for each, printed as `str`
/// would.
fn replace_with(
    origin: &'static str,
    regex: &Regex,
    text: &str,
    limit: Option<usize>,
    f: &Value,
    ctx: &Context,
) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for captures in regex.captures_iter(text).take(limit.unwrap_or(usize::MAX)) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        let produced = apply(f, vec![match_value(&captures)], ctx).into_value(origin)?;
        out.push_str(&text[last..whole.start()]);
        out.push_str(&produced.render(PrintStyle::Raw));
        last = whole.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

/// `(sb)` / `(sb initial)`: a new string builder.
pub(crate) fn builtin_sb(args: &[Value]) -> Result<Value> {
    between("sb", args, 0, 1)?;
    let initial = match args.first() {
        None | Some(Value::Nil) => String::new(),
        Some(other) => other.render(PrintStyle::Raw),
    };
    Ok(Value::auxiliary(StringBuilder::new(&initial)))
}

fn expect_builder<'a>(origin: &'static str, value: &'a Value) -> Result<&'a StringBuilder> {
    value
        .as_auxiliary::<StringBuilder>()
        .ok_or_else(|| EvalError::type_error(origin, "a string builder", value))
}

/// `(sb-append sb x)` appends `x` as `str` prints it; returns the builder.
pub(crate) fn builtin_sb_append(args: &[Value]) -> Result<Value> {
    let [sb, x] = exact::<2>("sb-append", args)?;
    let builder = expect_builder("sb-append", sb)?;
    if !x.is_nil() {
        builder.append(&x.render(PrintStyle::Raw));
    }
    Ok(sb.clone())
}

pub(crate) fn builtin_sb_reverse(args: &[Value]) -> Result<Value> {
    let [sb] = exact::<1>("sb-reverse", args)?;
    expect_builder("sb-reverse", sb)?.reverse();
    Ok(sb.clone())
}

/// `(re-pattern s)` compiles a regular expression.
pub(crate) fn builtin_re_pattern(args: &[Value]) -> Result<Value> {
    let [source] = exact::<1>("re-pattern", args)?;
    if source.as_auxiliary::<Pattern>().is_some() {
        return Ok(source.clone());
    }
    let source = expect_str("re-pattern", source)?;
    let pattern = Pattern::compile(source)
        .map_err(|err| EvalError::invalid_argument("re-pattern", err.to_string()))?;
    Ok(Value::auxiliary(pattern))
}

fn expect_pattern<'a>(origin: &'static str, value: &'a Value) -> Result<&'a Pattern> {
    value
        .as_auxiliary::<Pattern>()
        .ok_or_else(|| EvalError::type_error(origin, "a pattern", value))
}

/// The matched text for a pattern without groups, otherwise a vector of the
/// match and each group (nil for groups that did not take part).
fn match_value(captures: &Captures<'_>) -> Value {
    if captures.len() == 1 {
        return captures
            .get(0)
            .map_or(Value::Nil, |m| Value::string(m.as_str()));
    }
    Value::vector(
        captures
            .iter()
            .map(|group| group.map_or(Value::Nil, |m| Value::string(m.as_str()))),
    )
}

/// `(re-find pattern s)`: the first match, or nil.
pub(crate) fn builtin_re_find(args: &[Value]) -> Result<Value> {
    let [pattern, text] = exact::<2>("re-find", args)?;
    let regex = expect_pattern("re-find", pattern)?.regex();
    let text = expect_str("re-find", text)?;
    Ok(regex
        .captures(text)
        .map_or(Value::Nil, |captures| match_value(&captures)))
}

/// `(re-seq pattern s)`: every successive match as a list, or nil when
/// there is none.
pub(crate) fn builtin_re_seq(args: &[Value]) -> Result<Value> {
    let [pattern, text] = exact::<2>("re-seq", args)?;
    let regex = expect_pattern("re-seq", pattern)?.regex();
    let text = expect_str("re-seq", text)?;
    let matches: Vec<Value> = regex
        .captures_iter(text)
        .map(|captures| match_value(&captures))
        .collect();
    if matches.is_empty() {
        return Ok(Value::Nil);
    }
    Ok(Value::list(matches))
}

/// `(re-iterate pattern s f)`: call `(f match range)` for each match in
/// turn, stopping early once `f` returns true. Returns nil.
///
/// `match` is shaped as `re-find` returns it. `range` is `[start length]`
/// in characters, or a vector of one such range per group when the
/// pattern has groups.
pub(crate) fn builtin_re_iterate(args: &[Value], ctx: &Context) -> Result<Value> {
    let [pattern, text, f] = exact::<3>("re-iterate", args)?;
    let regex = expect_pattern("re-iterate", pattern)?.regex();
    let text = expect_str("re-iterate", text)?;

    let range = |m: regex::Match<'_>| {
        let start = text[..m.start()].chars().count();
        let length = m.as_str().chars().count();
        Value::vector([Value::Int(start as i64), Value::Int(length as i64)])
    };
    for captures in regex.captures_iter(text) {
        let ranges = if captures.len() == 1 {
            captures.get(0).map_or(Value::Nil, range)
        } else {
            Value::vector(captures.iter().map(|group| group.map_or(Value::Nil, range)))
        };
        let done = apply(f, vec![match_value(&captures), ranges], ctx).into_value("re-iterate")?;
        if done == Value::Bool(true) {
            break;
        }
    }
    Ok(Value::Nil)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InterpreterConfig;
    use crate::error::ErrorKind;
    use crate::runtime::Runtime;
    use crate::value::BuiltIn;

    fn ctx() -> Context {
        Runtime::new(InterpreterConfig::default())
            .unwrap()
            .root_context()
    }

    #[test]
    fn test_str_skips_nil_and_unquotes() {
        let result = builtin_str(&[
            Value::string("a"),
            Value::Nil,
            Value::Int(1),
            Value::Char('c'),
            Value::keyword("k"),
        ])
        .unwrap();
        assert_eq!(result, Value::string("a1c:k"));
        assert_eq!(builtin_str(&[]).unwrap(), Value::string(""));
    }

    #[test]
    fn test_string_builder() {
        let sb = builtin_sb(&[Value::string("ab")]).unwrap();
        builtin_sb_append(&[sb.clone(), Value::Int(12)]).unwrap();
        builtin_sb_reverse(&[sb.clone()]).unwrap();
        assert_eq!(builtin_str(&[sb]).unwrap(), Value::string("21ba"));
        let err = builtin_sb_append(&[Value::Nil, Value::Nil]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_re_find() {
        let plain = builtin_re_pattern(&[Value::string("[0-9]+")]).unwrap();
        assert_eq!(
            builtin_re_find(&[plain.clone(), Value::string("ab123c")]).unwrap(),
            Value::string("123")
        );
        assert_eq!(
            builtin_re_find(&[plain, Value::string("abc")]).unwrap(),
            Value::Nil
        );

        let groups = builtin_re_pattern(&[Value::string("(a)(x)?")]).unwrap();
        assert_eq!(
            builtin_re_find(&[groups, Value::string("ba")]).unwrap(),
            Value::vector([Value::string("a"), Value::string("a"), Value::Nil])
        );
    }

    #[test]
    fn test_invalid_pattern() {
        let err = builtin_re_pattern(&[Value::string("(")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    fn pattern(source: &str) -> Value {
        builtin_re_pattern(&[Value::string(source)]).unwrap()
    }

    #[test]
    fn test_subs_counts_characters() {
        let s = Value::string("h\u{e9}llo");
        assert_eq!(
            builtin_subs(&[s.clone(), Value::Int(1), Value::Int(3)]).unwrap(),
            Value::string("\u{e9}l")
        );
        assert_eq!(builtin_subs(&[s.clone(), Value::Int(5)]).unwrap(), Value::string(""));
        for args in [
            vec![s.clone(), Value::Int(6)],
            vec![s.clone(), Value::Int(-1)],
            vec![s.clone(), Value::Int(3), Value::Int(2)],
            vec![s, Value::Int(0), Value::Int(9)],
        ] {
            assert_eq!(builtin_subs(&args).unwrap_err().kind(), ErrorKind::OutOfBounds);
        }
    }

    #[test]
    fn test_case_conversion() {
        assert_eq!(
            builtin_upper_case(&[Value::string("abc")]).unwrap(),
            Value::string("ABC")
        );
        assert_eq!(
            builtin_lower_case(&[Value::keyword("Key")]).unwrap(),
            Value::string(":key")
        );
    }

    #[test]
    fn test_re_seq() {
        assert_eq!(
            builtin_re_seq(&[pattern("[0-9]+"), Value::string("a1b22c333")])
                .unwrap()
                .to_string(),
            "(\"1\" \"22\" \"333\")"
        );
        assert_eq!(
            builtin_re_seq(&[pattern("x"), Value::string("abc")]).unwrap(),
            Value::Nil
        );
        assert_eq!(
            builtin_re_seq(&[pattern("(a)(b)?"), Value::string("aab")])
                .unwrap()
                .to_string(),
            "([\"a\" \"a\" nil] [\"ab\" \"a\" \"b\"])"
        );
        let err = builtin_re_seq(&[Value::string("x"), Value::string("x")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_replace() {
        let ctx = ctx();
        let s = Value::string("a-b-c");
        let replace_all = |needle: Value, with: Value| builtin_replace(&[s.clone(), needle, with], &ctx);
        assert_eq!(
            replace_all(Value::string("-"), Value::string("+")).unwrap(),
            Value::string("a+b+c")
        );
        assert_eq!(
            replace_all(Value::Char('b'), Value::Char('B')).unwrap(),
            Value::string("a-B-c")
        );
        assert_eq!(
            builtin_replace_first(&[s.clone(), pattern("([a-z])-"), Value::string("$1=")], &ctx)
                .unwrap(),
            Value::string("a=b-c")
        );
        assert_eq!(
            replace_all(pattern("[a-z]"), Value::BuiltIn(BuiltIn::Symbol)).unwrap(),
            Value::string("a-b-c")
        );

        let err = replace_all(Value::string("-"), Value::Char('+')).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let err = replace_all(Value::Int(1), Value::string("+")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
