use odq_ir::{BinaryOperator as Op, Node};
use odq_types::{Member, MemberKind, Type};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

use crate::expr::{BinaryOp, ExprKind};
use crate::{
    host, CompileError, ErrorKind, Expr, FunctionRegistry, Param, QueryCompiler, Schema,
    SchemaResolver, Value,
};

const SCHEMA: &str = r#"{
    "enums": [
        { "name": "Color", "members": [
            { "name": "Red", "value": 1 },
            { "name": "Green", "value": 2 },
            { "name": "Blue", "value": 3 }
        ] }
    ],
    "entities": [
        { "name": "Animal", "properties": {
            "name": "String", "born": "DateTime", "weight": "Double",
            "price": "Decimal", "age": "Int32"
        } },
        { "name": "Critter", "base": "Animal", "properties": {
            "color": "Color", "tags": "List<String>", "scores": "Int32[]",
            "attributes": "Dictionary<String, String>",
            "counts": "Dictionary<String, Int32>",
            "friends": "List<Critter>", "id": "Guid", "farm": "Farm"
        } },
        { "name": "Farm", "properties": { "name": "String", "critters": "List<Critter>" } },
        { "name": "Dog", "base": "Critter", "properties": { "barks": "Bool" } }
    ]
}"#;

struct Fixture {
    registry: FunctionRegistry,
    resolver: SchemaResolver,
}

impl Fixture {
    fn new() -> Self {
        let schema: Schema = serde_json::from_str(SCHEMA).unwrap();
        Self {
            registry: FunctionRegistry::standard().unwrap(),
            resolver: SchemaResolver::new(&schema).unwrap(),
        }
    }

    fn compile(&self, node: &Node) -> Result<Expr, CompileError> {
        QueryCompiler::new(&self.registry, &self.resolver)
            .compile_predicate(&Type::entity("Critter"), node)
    }

    /// Body of the compiled predicate.
    fn body(&self, node: &Node) -> Expr {
        match self.compile(node).unwrap().kind {
            ExprKind::Lambda { body, .. } => *body,
            other => panic!("expected lambda, got {other:?}"),
        }
    }

    fn error(&self, node: &Node) -> CompileError {
        self.compile(node).unwrap_err()
    }
}

fn sym(name: &str) -> Node {
    Node::symbol(name)
}

fn num(text: &str) -> Node {
    Node::number(text)
}

fn s(text: &str) -> Node {
    Node::string(text)
}

fn bin(op: Op, left: Node, right: Node) -> Node {
    Node::binary(op, left, right)
}

fn path(text: &str) -> Node {
    Node::path(text.split('.')).unwrap()
}

fn this() -> Expr {
    Expr::parameter(&Param::new(0, "_this", Type::entity("Critter")))
}

fn prop(receiver: Expr, name: &str, ty: Type) -> Expr {
    Expr::property(receiver, name, ty)
}

fn constant(value: Value) -> Expr {
    Expr::constant(value)
}

fn call_member(expr: &Expr) -> &Member {
    match &expr.kind {
        ExprKind::Call { member, .. } | ExprKind::MemberAccess { member, .. } => member,
        other => panic!("expected call, got {other:?}"),
    }
}

// ===== Symbols and paths =====

#[test]
fn predicate_wraps_body_in_this_lambda() {
    let fx = Fixture::new();
    let lambda = fx
        .compile(&bin(Op::Equal, sym("name"), s("Bob")))
        .unwrap();
    assert_eq!(
        lambda.dump(),
        "Lambda (_this#0) : (Critter) -> Bool\n\
         \x20 Binary eq : Bool\n\
         \x20   Property name : String\n\
         \x20     Parameter _this#0 : Critter\n\
         \x20   Constant \"Bob\" : String\n"
    );
}

#[test]
fn keywords_and_this() {
    let fx = Fixture::new();
    assert_eq!(fx.body(&sym("this")), this());
    assert_eq!(fx.body(&sym("true")), constant(Value::Bool(true)));
    assert_eq!(fx.body(&sym("null")).ty, Type::Null);
}

#[test]
fn nested_path_resolves_on_each_receiver() {
    let fx = Fixture::new();
    let farm = prop(this(), "farm", Type::entity("Farm"));
    assert_eq!(fx.body(&path("farm.name")), prop(farm, "name", Type::String));
}

#[test]
fn unknown_symbol_names_receiver_type() {
    let fx = Fixture::new();
    let error = fx.error(&path("farm.color"));
    assert_eq!(
        error,
        CompileError::UnknownSymbol {
            name: "color".to_string(),
            on: Type::entity("Farm"),
        }
    );
    assert_eq!(error.to_string(), "unknown symbol `color` on Farm");
}

#[test]
fn keywords_are_properties_after_dot() {
    let fx = Fixture::new();
    assert_eq!(fx.error(&path("farm.true")).kind(), ErrorKind::UnknownSymbol);
}

// ===== Binary operators =====

#[test]
fn arithmetic_promotes_operands() {
    let fx = Fixture::new();
    let body = fx.body(&bin(Op::Add, sym("age"), num("1.5")));
    assert_eq!(
        body,
        Expr::binary(
            BinaryOp::Add,
            Expr::convert(prop(this(), "age", Type::Int32), Type::Double, false),
            constant(Value::Double(1.5)),
            Type::Double,
        )
    );
}

#[test]
fn integer_constants_widen_in_place() {
    let fx = Fixture::new();
    let body = fx.body(&bin(Op::GreaterThan, sym("weight"), num("2")));
    assert_eq!(
        body,
        Expr::binary(
            BinaryOp::GreaterThan,
            prop(this(), "weight", Type::Double),
            constant(Value::Double(2.0)),
            Type::Bool,
        )
    );

    let body = fx.body(&bin(Op::LessThan, sym("price"), num("5")));
    assert_eq!(
        body,
        Expr::binary(
            BinaryOp::LessThan,
            prop(this(), "price", Type::Decimal),
            constant(Value::Decimal(Decimal::from(5))),
            Type::Bool,
        )
    );
}

#[test]
fn suffixed_literals_keep_their_type() {
    let fx = Fixture::new();
    let body = fx.body(&bin(Op::Equal, sym("age"), num("2L")));
    assert_eq!(
        body,
        Expr::binary(
            BinaryOp::Equal,
            Expr::convert(prop(this(), "age", Type::Int32), Type::Int64, false),
            constant(Value::Int64(2)),
            Type::Bool,
        )
    );
    assert_eq!(
        fx.error(&bin(Op::Equal, sym("price"), num("5.5"))).kind(),
        ErrorKind::TypeMismatch
    );
    assert!(fx.compile(&bin(Op::Equal, sym("price"), num("5.5m"))).is_ok());
}

#[test]
fn logical_operators_require_bool() {
    let fx = Fixture::new();
    let error = fx.error(&bin(Op::AndAlso, sym("name"), sym("true")));
    assert_eq!(
        error.to_string(),
        "type mismatch: `and` cannot be applied to String and Bool"
    );
}

#[test]
fn strings_are_not_ordered() {
    let fx = Fixture::new();
    assert_eq!(
        fx.error(&bin(Op::LessThan, sym("name"), s("b"))).kind(),
        ErrorKind::TypeMismatch
    );
    assert!(fx
        .compile(&bin(Op::LessThan, sym("born"), sym("born")))
        .is_ok());
}

#[test]
fn null_compares_with_references_only() {
    let fx = Fixture::new();
    assert!(fx.compile(&bin(Op::Equal, sym("farm"), sym("null"))).is_ok());
    assert!(fx.compile(&bin(Op::NotEqual, sym("null"), sym("name"))).is_ok());
    assert_eq!(
        fx.error(&bin(Op::Equal, sym("age"), sym("null"))).kind(),
        ErrorKind::TypeMismatch
    );
}

#[test]
fn entities_compare_along_inheritance() {
    let fx = Fixture::new();
    assert!(fx.compile(&bin(Op::Equal, sym("this"), sym("farm"))).is_err());
    let any_friend = Node::call(
        "any",
        vec![
            sym("friends"),
            Node::lambda(["f"], bin(Op::Equal, sym("f"), sym("this"))),
        ],
    );
    assert!(fx.compile(&any_friend).is_ok());
}

// ===== Enums =====

#[test]
fn enum_compares_with_member_name() {
    let fx = Fixture::new();
    let body = fx.body(&bin(Op::Equal, sym("color"), s("green")));
    let ExprKind::Binary { left, right, .. } = &body.kind else {
        panic!("expected binary, got {body:?}");
    };
    assert!(matches!(left.kind, ExprKind::Convert { explicit: false, .. }));
    assert_eq!(left.ty, Type::Int32);
    assert_eq!(**right, constant(Value::Int32(2)));
}

#[test]
fn enum_coercion_keeps_operand_positions() {
    let fx = Fixture::new();
    let body = fx.body(&bin(Op::NotEqual, s("Blue"), sym("color")));
    let ExprKind::Binary { op, left, right } = &body.kind else {
        panic!("expected binary, got {body:?}");
    };
    assert_eq!(*op, BinaryOp::NotEqual);
    assert_eq!(**left, constant(Value::Int32(3)));
    assert_eq!(right.ty, Type::Int32);
}

#[test]
fn unknown_enum_member_is_a_mismatch() {
    let fx = Fixture::new();
    assert_eq!(
        fx.error(&bin(Op::Equal, sym("color"), s("purple"))).to_string(),
        "type mismatch: `purple` is not a member of Color"
    );
}

// ===== in =====

#[test]
fn in_compiles_to_contains() {
    let fx = Fixture::new();
    let body = fx.body(&bin(
        Op::In,
        sym("age"),
        Node::array(vec![num("1"), num("2")]),
    ));
    let array = constant(Value::Array {
        elem: Type::Int32,
        items: vec![Value::Int32(1), Value::Int32(2)],
    });
    assert_eq!(
        body,
        Expr::call(
            None,
            Member::instantiate(host::enumerable_contains(), &[], &[Type::Int32]),
            vec![array, prop(this(), "age", Type::Int32)],
        )
    );
}

#[test]
fn in_coerces_literals_to_element_type() {
    let fx = Fixture::new();
    let body = fx.body(&bin(Op::In, sym("weight"), Node::array(vec![num("1"), num("2.5")])));
    let ExprKind::Call { args, .. } = &body.kind else {
        panic!("expected call, got {body:?}");
    };
    assert_eq!(args[0].ty, Type::array(Type::Double));
}

#[test]
fn in_requires_matching_array() {
    let fx = Fixture::new();
    assert_eq!(
        fx.error(&bin(Op::In, sym("name"), Node::array(vec![num("1")])))
            .to_string(),
        "type mismatch: array of String cannot hold an element of type Int32"
    );
    assert_eq!(
        fx.error(&bin(Op::In, sym("name"), sym("name"))).kind(),
        ErrorKind::TypeMismatch
    );
}

#[test]
fn non_constant_array_elements_build_an_array() {
    let fx = Fixture::new();
    let body = fx.body(&bin(
        Op::In,
        sym("name"),
        Node::array(vec![s("a"), path("farm.name")]),
    ));
    let ExprKind::Call { args, .. } = &body.kind else {
        panic!("expected call, got {body:?}");
    };
    assert!(matches!(args[0].kind, ExprKind::NewArray { .. }));
}

// ===== Function calls =====

#[test]
fn instance_method_takes_receiver_from_first_argument() {
    let fx = Fixture::new();
    let body = fx.body(&Node::call("startswith", vec![sym("name"), s("B")]));
    assert_eq!(
        body,
        Expr::call(
            Some(prop(this(), "name", Type::String)),
            Member::definition(host::string_starts_with()),
            vec![constant(Value::String("B".into()))],
        )
    );
}

#[test]
fn argument_order_follows_mapping() {
    let fx = Fixture::new();
    let body = fx.body(&Node::call("substringof", vec![s("ob"), sym("name")]));
    assert_eq!(
        body,
        Expr::call(
            Some(prop(this(), "name", Type::String)),
            Member::definition(host::string_contains()),
            vec![constant(Value::String("ob".into()))],
        )
    );
}

#[test]
fn chained_call_matches_static_call() {
    let fx = Fixture::new();
    let chained = Node::dot(sym("name"), Node::call("startswith", vec![s("B")]));
    let plain = Node::call("startswith", vec![sym("name"), s("B")]);
    assert_eq!(fx.compile(&chained), fx.compile(&plain));
}

#[test]
fn first_fitting_candidate_wins() {
    let fx = Fixture::new();
    let replace = fx.body(&Node::call("replace", vec![sym("name"), s("a"), s("b")]));
    assert_eq!(call_member(&replace).id(), host::string_replace_string().id);

    let round = fx.body(&Node::call("round", vec![sym("price")]));
    assert_eq!(call_member(&round).id().as_str(), "decimal.round");
    assert_eq!(round.ty, Type::Decimal);

    let round = fx.body(&Node::call("round", vec![sym("weight")]));
    assert_eq!(round.ty, Type::Double);
}

#[test]
fn count_prefers_collection_property() {
    let fx = Fixture::new();
    let count = fx.body(&Node::call("count", vec![sym("tags")]));
    assert_eq!(
        count,
        Expr::member_access(
            prop(this(), "tags", Type::list(Type::String)),
            Member::instantiate(host::collection_count(), &[Type::String], &[]),
        )
    );
    assert_eq!(call_member(&count).kind(), MemberKind::Property);
}

#[test]
fn count_instantiates_for_element_type() {
    let fx = Fixture::new();
    let ints = fx.body(&Node::call("count", vec![sym("scores")]));
    assert_eq!(call_member(&ints).declaring_args(), &[Type::Int32]);
    let strings = fx.body(&Node::call("count", vec![sym("tags")]));
    assert_eq!(call_member(&strings).declaring_args(), &[Type::String]);
    assert_eq!(call_member(&ints).id(), call_member(&strings).id());
}

#[test]
fn date_parts_are_properties() {
    let fx = Fixture::new();
    let body = fx.body(&bin(
        Op::Equal,
        Node::call("year", vec![sym("born")]),
        num("2020"),
    ));
    let ExprKind::Binary { left, .. } = &body.kind else {
        panic!("expected binary, got {body:?}");
    };
    assert!(matches!(left.kind, ExprKind::MemberAccess { .. }));
    assert_eq!(left.ty, Type::Int32);
}

#[test]
fn literal_arguments_take_parameter_type() {
    let fx = Fixture::new();
    let body = fx.body(&Node::call("round", vec![num("2")]));
    let ExprKind::Call { args, .. } = &body.kind else {
        panic!("expected call, got {body:?}");
    };
    assert_eq!(args[0], constant(Value::Double(2.0)));
}

#[test]
fn unknown_function_reports_arity() {
    let fx = Fixture::new();
    let error = fx.error(&Node::call("frobnicate", vec![sym("name")]));
    assert_eq!(
        error,
        CompileError::UnknownFunction {
            name: "frobnicate".to_string(),
            arity: 1,
        }
    );
    // Known name, but no candidate accepts an Int32 receiver.
    assert_eq!(
        fx.error(&Node::call("startswith", vec![sym("age"), s("x")])).kind(),
        ErrorKind::UnknownFunction
    );
    // Known name, wrong arity.
    assert_eq!(
        fx.error(&Node::call("length", vec![sym("name"), s("x")])).kind(),
        ErrorKind::UnknownFunction
    );
}

#[test]
fn argument_errors_abort_compilation() {
    let fx = Fixture::new();
    assert_eq!(
        fx.error(&Node::call("startswith", vec![sym("name"), sym("nope")])).kind(),
        ErrorKind::UnknownSymbol
    );
}

// ===== Generic inference and lambdas =====

#[test]
fn lambda_parameter_type_is_inferred_from_sequence() {
    let fx = Fixture::new();
    let query = Node::call(
        "any",
        vec![
            sym("friends"),
            Node::lambda(["f"], bin(Op::Equal, path("f.name"), s("x"))),
        ],
    );
    assert_eq!(
        fx.compile(&query).unwrap().dump(),
        "Lambda (_this#0) : (Critter) -> Bool\n\
         \x20 Call Enumerable.Any<Critter>(Enumerable<Critter>, (Critter) -> Bool) : Bool\n\
         \x20   Property friends : List<Critter>\n\
         \x20     Parameter _this#0 : Critter\n\
         \x20   Lambda (f#1) : (Critter) -> Bool\n\
         \x20     Binary eq : Bool\n\
         \x20       Property name : String\n\
         \x20         Parameter f#1 : Critter\n\
         \x20       Constant \"x\" : String\n"
    );
}

#[test]
fn lambda_return_binds_result_type() {
    let fx = Fixture::new();
    let select = Node::call(
        "select",
        vec![sym("friends"), Node::lambda(["f"], path("f.age"))],
    );
    let body = fx.body(&Node::call(
        "any",
        vec![select, Node::lambda(["a"], bin(Op::GreaterThan, sym("a"), num("3")))],
    ));
    let ExprKind::Call { member, args, .. } = &body.kind else {
        panic!("expected call, got {body:?}");
    };
    assert_eq!(member.method_args(), &[Type::Int32]);
    assert_eq!(args[0].ty, Type::enumerable(Type::Int32));
    assert_eq!(call_member(&args[0]).method_args(), &[Type::entity("Critter"), Type::Int32]);
}

#[test]
fn nested_lambdas_see_outer_parameters() {
    let fx = Fixture::new();
    let inner = Node::call(
        "any",
        vec![
            path("f.tags"),
            Node::lambda(["t"], bin(Op::Equal, sym("t"), sym("name"))),
        ],
    );
    let query = Node::call("any", vec![sym("friends"), Node::lambda(["f"], inner)]);
    assert!(fx.compile(&query).is_ok());

    let uses_outer = Node::call(
        "any",
        vec![
            sym("tags"),
            Node::lambda(["t"], bin(Op::Equal, sym("t"), path("f.name"))),
        ],
    );
    let query = Node::call("all", vec![sym("friends"), Node::lambda(["f"], uses_outer)]);
    let body = fx.body(&query);
    assert!(body.dump().contains("Parameter f#1 : Critter"));
    assert!(body.dump().contains("Parameter t#2 : String"));
}

#[test]
fn lambda_parameters_are_not_visible_outside() {
    let fx = Fixture::new();
    let inner = Node::call(
        "any",
        vec![path("x.tags"), Node::lambda(["y"], bin(Op::Equal, sym("y"), s("a")))],
    );
    let leaks = bin(Op::AndAlso, inner, bin(Op::Equal, sym("y"), s("b")));
    let query = Node::call("any", vec![sym("friends"), Node::lambda(["x"], leaks)]);
    assert_eq!(
        fx.error(&query),
        CompileError::UnknownSymbol {
            name: "y".to_string(),
            on: Type::entity("Critter"),
        }
    );
    let after = bin(
        Op::AndAlso,
        Node::call("any", vec![sym("friends"), Node::lambda(["x"], sym("true"))]),
        bin(Op::Equal, path("x.name"), s("b")),
    );
    assert_eq!(fx.error(&after).kind(), ErrorKind::UnknownSymbol);
}

#[test]
fn inner_parameters_shadow_outer() {
    let fx = Fixture::new();
    let inner = Node::call(
        "any",
        vec![path("x.tags"), Node::lambda(["x"], bin(Op::Equal, sym("x"), s("a")))],
    );
    let query = Node::call("any", vec![sym("friends"), Node::lambda(["x"], inner)]);
    let dump = fx.body(&query).dump();
    assert!(dump.contains("Binary eq : Bool\n"));
    assert!(dump.contains("Parameter x#2 : String"));
}

#[test]
fn lambda_needs_function_context() {
    let fx = Fixture::new();
    assert_eq!(
        fx.error(&Node::lambda(["x"], sym("x"))).kind(),
        ErrorKind::TypeMismatch
    );
    let two_params = Node::call(
        "any",
        vec![sym("tags"), Node::lambda(["a", "b"], sym("true"))],
    );
    assert_eq!(
        fx.error(&two_params).to_string(),
        "type mismatch: lambda takes 2 parameter(s) but 1 are expected"
    );
}

#[test]
fn lambda_body_must_match_return_type() {
    let fx = Fixture::new();
    let query = Node::call("any", vec![sym("tags"), Node::lambda(["t"], sym("t"))]);
    assert_eq!(fx.error(&query).kind(), ErrorKind::UnknownFunction);
}

#[test]
fn sum_picks_element_overload() {
    let fx = Fixture::new();
    let body = fx.body(&Node::call("sum", vec![sym("scores")]));
    assert_eq!(body.ty, Type::Int32);
    let body = fx.body(&Node::call(
        "sum",
        vec![Node::call(
            "select",
            vec![sym("friends"), Node::lambda(["f"], path("f.weight"))],
        )],
    ));
    assert_eq!(body.ty, Type::Double);
}

// ===== Dictionaries =====

#[test]
fn indexer_reads_string_dictionary() {
    let fx = Fixture::new();
    let body = fx.body(&Node::indexer("counts", vec![s("legs")]));
    assert_eq!(
        body,
        Expr::call(
            Some(prop(
                this(),
                "counts",
                Type::dictionary(Type::String, Type::Int32)
            )),
            Member::instantiate(host::dictionary_get(), &[Type::String, Type::Int32], &[]),
            vec![constant(Value::String("legs".into()))],
        )
    );
}

#[test]
fn indexer_after_dot_uses_left_receiver() {
    let fx = Fixture::new();
    let query = Node::call(
        "any",
        vec![
            sym("friends"),
            Node::lambda(
                ["f"],
                bin(
                    Op::Equal,
                    Node::dot(sym("f"), Node::indexer("attributes", vec![s("k")])),
                    s("v"),
                ),
            ),
        ],
    );
    assert!(fx.compile(&query).is_ok());
}

#[test]
fn indexer_errors() {
    let fx = Fixture::new();
    assert_eq!(
        fx.error(&Node::indexer("name", vec![s("k")])).kind(),
        ErrorKind::UnsupportedConstruct
    );
    let error = fx.error(&Node::indexer("attributes", vec![s("a"), s("b")]));
    assert_eq!(error.to_string(), "`attributes[]` takes 1 argument(s), found 2");
    assert_eq!(
        fx.error(&Node::indexer("attributes", vec![num("1")])).kind(),
        ErrorKind::TypeMismatch
    );
}

#[test]
fn contains_binds_dictionary_arguments() {
    let fx = Fixture::new();
    let body = fx.body(&Node::call("contains", vec![sym("attributes"), s("a")]));
    assert_eq!(
        call_member(&body).declaring_args(),
        &[Type::String, Type::String]
    );
    assert_eq!(
        fx.error(&Node::call("contains", vec![sym("counts"), num("1")])).kind(),
        ErrorKind::UnknownFunction
    );
}

// ===== isof and cast =====

#[test]
fn isof_on_this_and_operand() {
    let fx = Fixture::new();
    assert_eq!(
        fx.body(&Node::call("isof", vec![sym("Dog")])),
        Expr::type_is(this(), Type::entity("Dog"))
    );
    let body = fx.body(&Node::call("isof", vec![sym("farm"), s("Farm")]));
    assert_eq!(body.ty, Type::Bool);
}

#[test]
fn cast_is_explicit_conversion() {
    let fx = Fixture::new();
    let body = fx.body(&Node::call("cast", vec![sym("weight"), sym("Int32")]));
    assert_eq!(
        body,
        Expr::convert(prop(this(), "weight", Type::Double), Type::Int32, true)
    );
    let dog = Node::dot(Node::call("cast", vec![sym("Dog")]), sym("barks"));
    assert_eq!(fx.body(&dog).ty, Type::Bool);
}

#[test]
fn cast_rejects_impossible_conversions() {
    let fx = Fixture::new();
    assert_eq!(
        fx.error(&Node::call("cast", vec![sym("name"), sym("Int32")])),
        CompileError::type_mismatch("cannot cast String to Int32")
    );
    assert_eq!(
        fx.error(&Node::call("cast", vec![sym("id"), sym("DateTime")])).kind(),
        ErrorKind::TypeMismatch
    );
    assert_eq!(
        fx.error(&Node::call("cast", vec![sym("Farm")])).kind(),
        ErrorKind::TypeMismatch
    );
    let color = fx.body(&Node::call("cast", vec![sym("color"), sym("Int64")]));
    assert_eq!(color.ty, Type::Int64);
    let animal = fx.body(&Node::call("cast", vec![sym("Animal")]));
    assert_eq!(animal.ty, Type::entity("Animal"));
}

#[test]
fn type_operator_errors() {
    let fx = Fixture::new();
    assert_eq!(
        fx.error(&Node::call("cast", vec![])).to_string(),
        "`cast` takes 1 or 2 argument(s), found 0"
    );
    assert_eq!(
        fx.error(&Node::call("isof", vec![sym("Cat")])),
        CompileError::UnknownType {
            name: "Cat".to_string()
        }
    );
    assert_eq!(
        fx.error(&Node::call("isof", vec![num("1")])).kind(),
        ErrorKind::UnsupportedConstruct
    );
}

// ===== Entry points =====

#[test]
fn explicit_lambda_parameters_and_outer_scope() {
    let fx = Fixture::new();
    let compiler = QueryCompiler::new(&fx.registry, &fx.resolver);
    let farm = Param::new(0, "farm", Type::entity("Farm"));
    let limit = Param::new(5, "limit", Type::Int32);
    let query = Node::call(
        "any",
        vec![
            sym("critters"),
            Node::lambda(["c"], bin(Op::GreaterThan, path("c.age"), sym("limit"))),
        ],
    );
    let lambda = compiler
        .compile(&query, &farm, std::slice::from_ref(&farm), std::slice::from_ref(&limit))
        .unwrap();
    assert_eq!(lambda.ty, Type::function(vec![Type::entity("Farm")], Type::Bool));
    assert!(lambda.dump().contains("Lambda (c#6) : (Critter) -> Bool"));
    assert!(lambda.dump().contains("Parameter limit#5 : Int32"));
}

#[test]
fn receiver_only_constructs_after_dot() {
    let fx = Fixture::new();
    let error = fx.error(&Node::dot(sym("farm"), s("x")));
    assert_eq!(error.kind(), ErrorKind::UnsupportedConstruct);
}

#[test]
fn deep_trees_compile() {
    let fx = Fixture::new();
    let mut node = sym("true");
    for _ in 0..2_000 {
        node = bin(Op::AndAlso, node, sym("true"));
    }
    assert_eq!(fx.body(&node).ty, Type::Bool);
}
