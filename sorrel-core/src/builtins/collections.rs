// sorrel-core - Collection built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Collection operations: hashmap, nth, get, count, assoc, dissoc, conj,
//! keys, vals

use crate::context::Context;
use crate::error::{EvalError, Result};
use crate::value::{Seq, Step, Value, ValueMap};

use super::{between, exact, expect_int};

/// `(hashmap k v ...)`; later keys win.
pub(crate) fn builtin_hashmap(args: &[Value]) -> Result<Value> {
    if args.len() % 2 != 0 {
        return Err(EvalError::invalid_argument(
            "hashmap",
            "requires an even number of arguments",
        ));
    }
    let mut map = ValueMap::new();
    for pair in args.chunks_exact(2) {
        map.insert(pair[0].clone(), pair[1].clone());
    }
    Ok(Value::Map(map))
}

/// Lookup used by `get` and by keywords, symbols and maps in call
/// position. Missing keys and non-associative collections give `fallback`.
pub(crate) fn get(coll: &Value, key: &Value, fallback: Value) -> Result<Value> {
    let found = match (coll, key) {
        (Value::Map(map), _) => map.get(key).cloned(),
        (Value::Vector(items), Value::Int(i)) => {
            usize::try_from(*i).ok().and_then(|i| items.get(i).cloned())
        }
        (Value::String(s), Value::Int(i)) => usize::try_from(*i)
            .ok()
            .and_then(|i| s.chars().nth(i))
            .map(Value::Char),
        _ => None,
    };
    Ok(found.unwrap_or(fallback))
}

/// `(get coll key)` / `(get coll key fallback)`
pub(crate) fn builtin_get(args: &[Value]) -> Result<Value> {
    between("get", args, 2, 3)?;
    let fallback = args.get(2).cloned().unwrap_or(Value::Nil);
    get(&args[0], &args[1], fallback)
}

/// `(nth coll index)` fails on a missing index; `(nth coll index fallback)`
/// returns the fallback instead.
pub(crate) fn builtin_nth(args: &[Value], ctx: &Context) -> Result<Value> {
    between("nth", args, 2, 3)?;
    let index = expect_int("nth", &args[1])?;
    let fallback = args.get(2).cloned();
    let missing = || match &fallback {
        Some(value) => Ok(value.clone()),
        None => Err(EvalError::out_of_bounds("nth", index)),
    };
    let Ok(position) = usize::try_from(index) else {
        return missing();
    };

    let found = match &args[0] {
        Value::Nil => return Ok(fallback.clone().unwrap_or(Value::Nil)),
        Value::Vector(items) => items.get(position).cloned(),
        Value::String(s) => s.chars().nth(position).map(Value::Char),
        Value::Seq(seq) => {
            let mut current = seq.clone();
            let mut remaining = position;
            loop {
                match current.step(ctx)? {
                    Step::Empty => break None,
                    Step::Item(first, _) if remaining == 0 => break Some(first),
                    Step::Item(_, rest) => {
                        remaining -= 1;
                        current = rest;
                    }
                }
            }
        }
        other => return Err(EvalError::type_error("nth", "an indexed collection", other)),
    };
    match found {
        Some(value) => Ok(value),
        None => missing(),
    }
}

pub(crate) fn builtin_count(args: &[Value], ctx: &Context) -> Result<Value> {
    let [coll] = exact::<1>("count", args)?;
    let count = match coll {
        Value::Nil => 0,
        Value::String(s) => s.chars().count(),
        Value::Vector(items) => items.len(),
        Value::Map(map) => map.len(),
        Value::Seq(Seq::List(items)) => items.len(),
        Value::Seq(seq) => seq.to_vec(ctx)?.len(),
        other => return Err(EvalError::type_error("count", "a collection", other)),
    };
    i64::try_from(count)
        .map(Value::Int)
        .map_err(|_| EvalError::overflow("count"))
}

/// `(assoc coll k v ...)`. On a vector the key is an index no larger than
/// the length; assoc at the length appends. `nil` acts as an empty map.
pub(crate) fn builtin_assoc(args: &[Value]) -> Result<Value> {
    if args.len() < 3 || args.len() % 2 == 0 {
        return Err(EvalError::arity("assoc", "3, 5, 7, ...", args.len()));
    }
    let pairs = args[1..].chunks_exact(2);
    match &args[0] {
        Value::Nil | Value::Map(_) => {
            let mut map = match &args[0] {
                Value::Map(map) => map.clone(),
                _ => ValueMap::new(),
            };
            for pair in pairs {
                map.insert(pair[0].clone(), pair[1].clone());
            }
            Ok(Value::Map(map))
        }
        Value::Vector(items) => {
            let mut items = items.clone();
            for pair in pairs {
                let index = expect_int("assoc", &pair[0])?;
                match usize::try_from(index) {
                    Ok(i) if i < items.len() => {
                        items.set(i, pair[1].clone());
                    }
                    Ok(i) if i == items.len() => items.push_back(pair[1].clone()),
                    _ => return Err(EvalError::out_of_bounds("assoc", index)),
                }
            }
            Ok(Value::Vector(items))
        }
        other => Err(EvalError::type_error("assoc", "a map or vector", other)),
    }
}

/// `(dissoc map k ...)`
pub(crate) fn builtin_dissoc(args: &[Value]) -> Result<Value> {
    let Some((coll, keys)) = args.split_first() else {
        return Err(EvalError::arity("dissoc", "1+", 0));
    };
    match coll {
        Value::Nil => Ok(Value::Nil),
        Value::Map(map) => {
            let mut map = map.clone();
            for key in keys {
                map.remove(key);
            }
            Ok(Value::Map(map))
        }
        other => Err(EvalError::type_error("dissoc", "a map", other)),
    }
}

/// `(conj coll x ...)`: vectors grow at the end, lists and sequences at the
/// front, maps take `[k v]` pairs or other maps. `nil` acts as an empty
/// list.
pub(crate) fn builtin_conj(args: &[Value]) -> Result<Value> {
    let Some((coll, items)) = args.split_first() else {
        return Err(EvalError::arity("conj", "1+", 0));
    };
    match coll {
        Value::Nil => Ok(Value::list(items.iter().rev().cloned())),
        Value::Seq(Seq::List(list)) => {
            let mut list = list.clone();
            for item in items {
                list.push_front(item.clone());
            }
            Ok(Value::Seq(Seq::List(list)))
        }
        Value::Seq(seq) => Ok(Value::Seq(
            items
                .iter()
                .fold(seq.clone(), |rest, item| Seq::cons(item.clone(), rest)),
        )),
        Value::Vector(vector) => {
            let mut vector = vector.clone();
            vector.extend(items.iter().cloned());
            Ok(Value::Vector(vector))
        }
        Value::Map(map) => {
            let mut map = map.clone();
            for item in items {
                match item {
                    Value::Vector(pair) if pair.len() == 2 => {
                        map.insert(pair[0].clone(), pair[1].clone());
                    }
                    Value::Map(other) => map.extend(other.clone()),
                    Value::Nil => {}
                    other => {
                        return Err(EvalError::type_error(
                            "conj",
                            "a [key value] vector or a map",
                            other,
                        ));
                    }
                }
            }
            Ok(Value::Map(map))
        }
        other => Err(EvalError::type_error("conj", "a collection", other)),
    }
}

fn map_part(origin: &'static str, args: &[Value], part: fn(&Value, &Value) -> Value) -> Result<Value> {
    let [coll] = exact::<1>(origin, args)?;
    match coll {
        Value::Nil => Ok(Value::Nil),
        Value::Map(map) if map.is_empty() => Ok(Value::Nil),
        Value::Map(map) => Ok(Value::list(map.iter().map(|(k, v)| part(k, v)))),
        other => Err(EvalError::type_error(origin, "a map", other)),
    }
}

/// `(keys map)`: a list of the keys, or nil for an empty map.
pub(crate) fn builtin_keys(args: &[Value]) -> Result<Value> {
    map_part("keys", args, |k, _| k.clone())
}

pub(crate) fn builtin_vals(args: &[Value]) -> Result<Value> {
    map_part("vals", args, |_, v| v.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InterpreterConfig;
    use crate::error::ErrorKind;
    use crate::runtime::Runtime;
    use pretty_assertions::assert_eq;

    fn ctx() -> Context {
        Runtime::new(InterpreterConfig::default())
            .unwrap()
            .root_context()
    }

    fn ints(values: &[i64]) -> Value {
        Value::vector(values.iter().copied().map(Value::Int))
    }

    #[test]
    fn test_hashmap_requires_pairs() {
        let err = builtin_hashmap(&[Value::keyword("a")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let map = builtin_hashmap(&[
            Value::keyword("a"),
            Value::Int(1),
            Value::keyword("a"),
            Value::Int(2),
        ])
        .unwrap();
        assert_eq!(map, Value::map([(Value::keyword("a"), Value::Int(2))]));
    }

    #[test]
    fn test_nth() {
        let ctx = ctx();
        let v = ints(&[1, 2, 3]);
        assert_eq!(builtin_nth(&[v.clone(), Value::Int(2)], &ctx).unwrap(), Value::Int(3));
        let err = builtin_nth(&[v.clone(), Value::Int(3)], &ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfBounds);
        assert_eq!(
            builtin_nth(&[v, Value::Int(-1), Value::Nil], &ctx).unwrap(),
            Value::Nil
        );
        let list = Value::list([Value::Int(7), Value::Int(8)]);
        assert_eq!(builtin_nth(&[list, Value::Int(1)], &ctx).unwrap(), Value::Int(8));
    }

    #[test]
    fn test_get_with_fallback() {
        let map = Value::map([(Value::keyword("a"), Value::Int(1))]);
        assert_eq!(
            builtin_get(&[map.clone(), Value::keyword("a")]).unwrap(),
            Value::Int(1)
        );
        assert_eq!(
            builtin_get(&[map, Value::keyword("b"), Value::Int(0)]).unwrap(),
            Value::Int(0)
        );
        assert_eq!(
            builtin_get(&[Value::Int(5), Value::Int(0)]).unwrap(),
            Value::Nil
        );
    }

    #[test]
    fn test_count() {
        let ctx = ctx();
        assert_eq!(builtin_count(&[Value::Nil], &ctx).unwrap(), Value::Int(0));
        assert_eq!(
            builtin_count(&[Value::string("héllo")], &ctx).unwrap(),
            Value::Int(5)
        );
        let err = builtin_count(&[Value::Int(1)], &ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_assoc_vector_bounds() {
        let v = ints(&[1, 2]);
        assert_eq!(
            builtin_assoc(&[v.clone(), Value::Int(2), Value::Int(3)]).unwrap(),
            ints(&[1, 2, 3])
        );
        assert_eq!(
            builtin_assoc(&[v.clone(), Value::Int(0), Value::Int(9)]).unwrap(),
            ints(&[9, 2])
        );
        let err = builtin_assoc(&[v, Value::Int(5), Value::Int(3)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfBounds);
    }

    #[test]
    fn test_conj_placement() {
        assert_eq!(
            builtin_conj(&[ints(&[1]), Value::Int(2)]).unwrap(),
            ints(&[1, 2])
        );
        let list = builtin_conj(&[Value::list([Value::Int(1)]), Value::Int(2), Value::Int(3)]).unwrap();
        assert_eq!(list.to_string(), "(3 2 1)");
        let map = builtin_conj(&[
            Value::map([]),
            Value::vector([Value::keyword("k"), Value::Int(1)]),
        ])
        .unwrap();
        assert_eq!(map, Value::map([(Value::keyword("k"), Value::Int(1))]));
    }

    #[test]
    fn test_keys_of_empty_map_is_nil() {
        assert_eq!(builtin_keys(&[Value::map([])]).unwrap(), Value::Nil);
        assert_eq!(
            builtin_vals(&[Value::map([(Value::Int(1), Value::Int(2))])]).unwrap(),
            Value::list([Value::Int(2)])
        );
    }
}
