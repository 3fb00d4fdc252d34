//! The Peggy grammar, written with `peg`.
//!
//! Every action builds typed nodes through the [`Builder`], which turns
//! byte positions into spans and collects comments as whitespace is
//! skipped.

use peggy_ast::{
    Action, Any, Binding, BindingClause, Boundaries, Boundary, BoundaryConstant, BoundaryFunction,
    BoundaryVariable, Choice, Class, ClassPart, Code, Delimiter, ExportName, Expression, Grammar,
    GrammarImport, Group, ImportClause, Initializer, Labeled, LibraryRef, Literal, Name, Named,
    Prefixed, Punctuation, QuotedString, RenameClause, Repeated, Rule, RuleRef, SemanticPredicate,
    Sequence, Suffixed, TopLevelInitializer,
};

use crate::builder::Builder;

pub(crate) fn recognize(
    text: &str,
    builder: &Builder<'_>,
) -> Result<Grammar, peg::error::ParseError<peg::str::LineCol>> {
    peggy::grammar_file(text, builder)
}

enum Suffix {
    Optional(Punctuation),
    ZeroOrMore(Punctuation),
    OneOrMore(Punctuation),
    Repeat(Repetition),
}

struct Repetition {
    pipe1: Punctuation,
    boundaries: Boundaries,
    delimiter: Option<Delimiter>,
    pipe2: Punctuation,
}

fn char_from_hex(digits: &str) -> Result<char, &'static str> {
    u32::from_str_radix(digits, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or("valid Unicode code point")
}

fn named(display: QuotedString, expression: Expression) -> Expression {
    let span = display.span.cover(expression.span());
    Expression::Named(Box::new(Named {
        name: display,
        expression,
        span,
    }))
}

fn suffixed(expression: Expression, suffix: Option<Suffix>, span: peggy_ast::Span) -> Expression {
    match suffix {
        None => expression,
        Some(Suffix::Optional(operator)) => Expression::Optional(Box::new(Suffixed {
            expression,
            operator,
            span,
        })),
        Some(Suffix::ZeroOrMore(operator)) => Expression::ZeroOrMore(Box::new(Suffixed {
            expression,
            operator,
            span,
        })),
        Some(Suffix::OneOrMore(operator)) => Expression::OneOrMore(Box::new(Suffixed {
            expression,
            operator,
            span,
        })),
        Some(Suffix::Repeat(repetition)) => Expression::Repeated(Box::new(Repeated {
            expression,
            pipe1: repetition.pipe1,
            boundaries: repetition.boundaries,
            delimiter: repetition.delimiter,
            pipe2: repetition.pipe2,
            span,
        })),
    }
}

peg::parser! {
    grammar peggy(b: &Builder<'_>) for str {
        pub rule grammar_file() -> Grammar
            = s:position!() __
              imports:(i:import_declaration() __ { i })*
              top_level_initializer:(t:top_level_initializer() __ { t })?
              initializer:(i:initializer() __ { i })?
              rules:(r:rule_definition() __ { r })+
              e:position!()
            {
                Grammar {
                    imports,
                    top_level_initializer,
                    initializer,
                    rules,
                    span: b.span(s, e),
                }
            }

        // ------------------------------------------------------------------
        // Imports
        // ------------------------------------------------------------------

        rule import_declaration() -> GrammarImport
            = s:position!() "import" !ident_part() __ what:import_clause() __ "from" !ident_part() __
              from:quoted() (__ ";")? e:position!()
            {
                b.import(&what);
                GrammarImport { what, from, span: b.span(s, e) }
            }
            / s:position!() "import" !ident_part() __ from:quoted() (__ ";")? e:position!()
            {
                b.import(&[]);
                GrammarImport { what: Vec::new(), from, span: b.span(s, e) }
            }

        rule import_clause() -> Vec<ImportClause>
            = c:namespace_import() { vec![c] }
            / named_imports()
            / d:default_import() rest:(__ "," __ r:import_clause_tail() { r })?
            {
                let mut clauses = vec![d];
                clauses.extend(rest.into_iter().flatten());
                clauses
            }

        rule import_clause_tail() -> Vec<ImportClause>
            = c:namespace_import() { vec![c] }
            / named_imports()

        rule namespace_import() -> ImportClause
            = s:position!() "*" __ "as" !ident_part() __ binding:binding() e:position!()
            { ImportClause::All(BindingClause { binding, span: b.span(s, e) }) }

        rule named_imports() -> Vec<ImportClause>
            = "{" __ clauses:(import_specifier() ** (__ "," __)) __ ("," __)? "}" { clauses }

        rule import_specifier() -> ImportClause
            = s:position!() rename:export_name() __ "as" !ident_part() __ binding:binding() e:position!()
            { ImportClause::Rename(RenameClause { rename, binding, span: b.span(s, e) }) }
            / binding:binding()
            { ImportClause::Named(BindingClause { span: binding.span.clone(), binding }) }

        rule default_import() -> ImportClause
            = binding:binding()
            { ImportClause::Default(BindingClause { span: binding.span.clone(), binding }) }

        rule export_name() -> ExportName
            = n:identifier() { ExportName::Name(n) }
            / q:quoted() { ExportName::Quoted(q) }

        rule binding() -> Binding
            = id:identifier() { Binding { span: id.span.clone(), id } }

        // ------------------------------------------------------------------
        // Initializers and rules
        // ------------------------------------------------------------------

        rule top_level_initializer() -> TopLevelInitializer
            = s:position!() open:punc(<"{">) code:code_block() close:punc(<"}">)
              semi:semicolon()? e:position!()
            { TopLevelInitializer { open, code, close, semi, span: b.span(s, e) } }

        rule initializer() -> Initializer
            = s:position!() code:code_block() semi:semicolon()? e:position!()
            { Initializer { code, semi, span: b.span(s, e) } }

        rule rule_definition() -> Rule
            = s:position!() name:identifier() __ display:(d:quoted() __ { d })?
              equals:punc(<"=">) __ body:expression() semi:semicolon()? e:position!()
            {
                let expression = match display {
                    Some(display_name) => named(display_name, body),
                    None => body,
                };
                Rule { name, equals, expression, semi, span: b.span(s, e) }
            }

        rule semicolon() -> Punctuation
            = __ p:punc(<";">) { p }

        // ------------------------------------------------------------------
        // Expressions, loosest binding first
        // ------------------------------------------------------------------

        rule expression() -> Expression = choice()

        rule choice() -> Expression
            = s:position!() first:action()
              rest:(__ slash:punc(<"/">) __ alternative:action() { (slash, alternative) })*
              e:position!()
            {
                if rest.is_empty() {
                    first
                } else {
                    let (slashes, others): (Vec<_>, Vec<_>) = rest.into_iter().unzip();
                    let mut alternatives = vec![first];
                    alternatives.extend(others);
                    Expression::Choice(Box::new(Choice { alternatives, slashes, span: b.span(s, e) }))
                }
            }

        rule action() -> Expression
            = s:position!() expression:sequence() block:(__ c:code_block() { c })? e:position!()
            {
                match block {
                    Some(code) => Expression::Action(Box::new(Action { expression, code, span: b.span(s, e) })),
                    None => expression,
                }
            }

        rule sequence() -> Expression
            = s:position!() first:labeled() rest:(__ l:labeled() { l })* e:position!()
            {
                if rest.is_empty() {
                    first
                } else {
                    let mut elements = vec![first];
                    elements.extend(rest);
                    Expression::Sequence(Box::new(Sequence { elements, span: b.span(s, e) }))
                }
            }

        rule labeled() -> Expression
            = s:position!() at:punc(<"@">) label:(__ l:label() { l })? __ expression:prefixed() e:position!()
            {
                let (name, colon) = label.map_or((None, None), |(name, colon)| (Some(name), Some(colon)));
                Expression::Labeled(Box::new(Labeled {
                    at: Some(at),
                    name,
                    colon,
                    expression,
                    pick: true,
                    span: b.span(s, e),
                }))
            }
            / s:position!() label:label() __ expression:prefixed() e:position!()
            {
                let (name, colon) = label;
                Expression::Labeled(Box::new(Labeled {
                    at: None,
                    name: Some(name),
                    colon: Some(colon),
                    expression,
                    pick: false,
                    span: b.span(s, e),
                }))
            }
            / prefixed()

        rule label() -> (Name, Punctuation)
            = name:label_name() __ colon:punc(<":">) { (name, colon) }

        rule label_name() -> Name
            = name:identifier() {?
                if b.is_reserved(&name.value) {
                    Err("label that is not a reserved word")
                } else {
                    Ok(name)
                }
            }

        rule prefixed() -> Expression
            = s:position!() operator:punc(<"$">) __ expression:suffixed() e:position!()
            { Expression::Text(Box::new(Prefixed { operator, expression, span: b.span(s, e) })) }
            / s:position!() operator:punc(<"&">) __ expression:suffixed() e:position!()
            { Expression::SimpleAnd(Box::new(Prefixed { operator, expression, span: b.span(s, e) })) }
            / s:position!() operator:punc(<"!">) __ expression:suffixed() e:position!()
            { Expression::SimpleNot(Box::new(Prefixed { operator, expression, span: b.span(s, e) })) }
            / suffixed()

        rule suffixed() -> Expression
            = s:position!() expression:primary() suffix:(__ x:suffix() { x })? e:position!()
            { suffixed(expression, suffix, b.span(s, e)) }

        rule suffix() -> Suffix
            = operator:punc(<"?">) { Suffix::Optional(operator) }
            / operator:punc(<"*">) { Suffix::ZeroOrMore(operator) }
            / operator:punc(<"+">) { Suffix::OneOrMore(operator) }
            / pipe1:punc(<"|">) __ boundaries:boundaries() __
              delimiter:(d:delimiter() __ { d })? pipe2:punc(<"|">)
            { Suffix::Repeat(Repetition { pipe1, boundaries, delimiter, pipe2 }) }

        rule boundaries() -> Boundaries
            = s:position!() min:(m:boundary() __ { m })? dots:punc(<"..">) max:(__ m:boundary() { m })?
              e:position!()
            { Boundaries { min, dots: Some(dots), max, span: b.span(s, e) } }
            / s:position!() exact:boundary() e:position!()
            { Boundaries { min: Some(exact), dots: None, max: None, span: b.span(s, e) } }

        rule boundary() -> Boundary
            = s:position!() digits:integer() e:position!() {?
                digits
                    .parse::<u32>()
                    .map(|value| Boundary::Constant(BoundaryConstant { value, span: b.span(s, e) }))
                    .map_err(|_| "repetition count that fits in 32 bits")
            }
            / name:identifier()
            { Boundary::Variable(BoundaryVariable { value: name.value, span: name.span }) }
            / code:code_block()
            { Boundary::Function(BoundaryFunction { span: code.span.clone(), code }) }

        rule delimiter() -> Delimiter
            = s:position!() comma:punc(<",">) __ expression:nested(<expression()>) e:position!()
            { Delimiter { comma, expression, span: b.span(s, e) } }

        rule primary() -> Expression
            = l:literal() { Expression::Literal(l) }
            / c:class() { Expression::Class(c) }
            / a:any() { Expression::Any(a) }
            / l:library_ref() { Expression::LibraryRef(l) }
            / r:rule_ref() { Expression::RuleRef(r) }
            / semantic_predicate()
            / group()

        rule literal() -> Literal
            = s:position!() q:quoted() flag:"i"? e:position!()
            {
                Literal {
                    before: q.before,
                    value: q.value,
                    raw: q.raw,
                    after: q.after,
                    ignore_case: flag.is_some(),
                    span: b.span(s, e),
                }
            }

        rule class() -> Class
            = s:position!() "[" inverted:"^"? parts:class_part()* "]" flag:"i"? e:position!()
            {
                Class {
                    parts,
                    inverted: inverted.is_some(),
                    ignore_case: flag.is_some(),
                    span: b.span(s, e),
                }
            }

        rule class_part() -> ClassPart
            = low:class_char() upper:("-" h:class_char() { h })? {?
                match upper {
                    None => Ok(ClassPart::Char(low)),
                    Some(high) if low <= high => Ok(ClassPart::Range(low, high)),
                    Some(_) => Err("character range in ascending order"),
                }
            }

        rule class_char() -> char
            = !("]" / "\\" / line_terminator()) ch:[_] { ch }
            / "\\" escaped:escape() {? escaped.ok_or("character class member") }

        rule any() -> Any
            = s:position!() "." e:position!() { Any { span: b.span(s, e) } }

        rule library_ref() -> LibraryRef
            = s:position!() library:identifier() "." name:identifier() e:position!()
            {
                LibraryRef {
                    library_number: b.library_number(&library.value),
                    name,
                    library,
                    span: b.span(s, e),
                }
            }

        rule rule_ref() -> RuleRef
            = name:identifier() !(__ (quoted() __)? "=")
            { RuleRef { span: name.span.clone(), name } }

        rule semantic_predicate() -> Expression
            = s:position!() operator:punc(<"&">) __ code:code_block() e:position!()
            { Expression::SemanticAnd(SemanticPredicate { operator, code, span: b.span(s, e) }) }
            / s:position!() operator:punc(<"!">) __ code:code_block() e:position!()
            { Expression::SemanticNot(SemanticPredicate { operator, code, span: b.span(s, e) }) }

        rule group() -> Expression
            = s:position!() open:punc(<"(">) __ expression:nested(<expression()>) __
              close:punc(<")">) e:position!()
            { Expression::Group(Box::new(Group { open, expression, close, span: b.span(s, e) })) }

        // ------------------------------------------------------------------
        // Lexical structure
        // ------------------------------------------------------------------

        rule code_block() -> Code
            = s:position!() open:punc(<"{">) value:$(code_body()) close:punc(<"}">) e:position!()
            { Code { open, value: value.to_owned(), close, span: b.span(s, e) } }

        rule code_body() -> ()
            = (quiet!{ [^ '{' | '}']+ } {} / quiet!{ "{" } nested(<code_body()>) quiet!{ "}" } {})* {}

        // Bounds recursion so that deeply nested input fails with an
        // expectation instead of exhausting the stack.
        rule nested<T>(inner: rule<T>) -> T
            = descend() value:inner() ascend() { value }
            / ascend() !"" value:inner() { value }

        rule descend() = position!() {? b.descend() }

        rule ascend() = position!() { b.ascend() }

        rule quoted() -> QuotedString
            = s:position!() before:punc(<"\"">) chars:double_char()* after:punc(<"\"">) e:position!()
            { b.quoted((s, e), before, chars, after) }
            / s:position!() before:punc(<"'">) chars:single_char()* after:punc(<"'">) e:position!()
            { b.quoted((s, e), before, chars, after) }

        rule double_char() -> Option<char>
            = !("\"" / "\\" / line_terminator()) ch:[_] { Some(ch) }
            / "\\" escaped:escape() { escaped }

        rule single_char() -> Option<char>
            = !("'" / "\\" / line_terminator()) ch:[_] { Some(ch) }
            / "\\" escaped:escape() { escaped }

        // `None` marks a line continuation, which contributes no character.
        rule escape() -> Option<char>
            = line_terminator_sequence() { None }
            / "0" !['0'..='9'] { Some('\0') }
            / "b" { Some('\u{8}') }
            / "f" { Some('\u{c}') }
            / "n" { Some('\n') }
            / "r" { Some('\r') }
            / "t" { Some('\t') }
            / "v" { Some('\u{b}') }
            / "x" digits:$(hex_digit()*<2>) {? char_from_hex(digits).map(Some) }
            / "u{" digits:$(hex_digit()+) "}" {? char_from_hex(digits).map(Some) }
            / "u" digits:$(hex_digit()*<4>) {? char_from_hex(digits).map(Some) }
            / !(['0'..='9' | 'x' | 'u'] / line_terminator()) ch:[_] { Some(ch) }

        rule hex_digit()
            = quiet!{ ['0'..='9' | 'a'..='f' | 'A'..='F'] } / expected!("hexadecimal digit")

        rule integer() -> &'input str
            = quiet!{ $(['0'..='9']+) } / expected!("integer")

        rule identifier() -> Name
            = quiet!{ s:position!() value:$(ident_start() ident_part()*) { b.name(s, value) } }
            / expected!("identifier")

        rule ident_start() = [ch if ch.is_alphabetic() || ch == '_' || ch == '$']

        rule ident_part()
            = [ch if ch.is_alphanumeric() || matches!(ch, '_' | '$' | '\u{200C}' | '\u{200D}')]

        rule punc(token: rule<()>) -> Punctuation
            = s:position!() value:$(token()) { b.punc(s, value) }

        rule line_terminator()
            = quiet!{ ['\n' | '\r' | '\u{2028}' | '\u{2029}'] } / expected!("end of line")

        rule line_terminator_sequence() = "\r\n" / line_terminator()

        rule __() = quiet!{ ([ch if ch.is_whitespace()] / comment())* }

        rule comment() = block_comment() / line_comment()

        rule block_comment()
            = s:position!() "/*" value:$((!"*/" [_])*) "*/" e:position!()
            { b.block_comment(s, e, value) }

        rule line_comment()
            = s:position!() "//" value:$((!line_terminator() [_])*) e:position!()
            { b.line_comment(s, e, value) }
    }
}
