#[cfg(test)]
pub mod test {
    use std::collections::BTreeMap;

    use toml::value::Datetime;

    use crate::convert::{Either, FromResolved, Resolved, Typed};
    use crate::descriptor::TypeDescriptor;
    use crate::error::ConfigError;
    use crate::record::{Fields, Record, Shape, convert};
    use crate::schema::{FieldDecl, Schema};
    use crate::value::{Table, Value, table_from_toml};

    /// Build a raw table from a JSON literal.
    pub fn data(value: serde_json::Value) -> Table {
        match Value::from(value) {
            Value::Table(table) => table,
            other => panic!("Expected a JSON object, got: {other:?}"),
        }
    }

    pub fn parse(content: &str) -> Table {
        table_from_toml(content.parse::<toml::Table>().unwrap())
    }

    /// The `[tool]` table of [`SAMPLE_TOML`].
    pub fn sample_tool() -> Table {
        parse(SAMPLE_TOML)["tool"].as_table().unwrap().clone()
    }

    pub const SAMPLE_TOML: &str = r#"
[tool.first]
string = "src"
list_of_string = ["a", "b"]
list_of_int = [1, 2, 3]
list_of_float = [1.0, 2.5]
list_of_numbers = [1, 2.5]
some_boolean = true
number = 3.5
not_a_number = nan
datetime = 1979-05-27T07:32:00Z
datetimes = [1979-05-27T07:32:00Z, 2023-01-01T00:00:00Z]

[tool.first.extra]
name = { first = "Steve", last = "Jobs" }

[[tool.fruits]]
name = "apple"
physical = { color = "red", shape = "round" }

[[tool.fruits.varieties]]
name = "red delicious"

[[tool.fruits.varieties]]
name = "granny smith"

[[tool.fruits]]
name = "banana"

[[tool.fruits.varieties]]
name = "plantain"

[tool.second-extra]
allowed = false
"#;

    pub const MULTIPLE_TOPLEVEL_TOML: &str = r#"
[relevant]
key = "this one!"

[tool]
key = 3

[key]
value = "fallback"

[complex.kind]
alpha = "a fairly long string value"
beta = "another fairly long string value"
gamma = [1, 2, 3, 4, 5, 6, 7, 8, 9]
"#;

    pub const DICT_OF_CUSTOM_TOML: &str = r#"
[structure.contents.origin]
x = 0
y = 0

[structure.contents.corner]
x = 10
y = 20
"#;

    // -- Small records ------------------------------------------------------

    crate::record! {
        #[derive(Debug, Clone, PartialEq)]
        pub struct Point {
            pub x: i64,
            pub y: i64,
        }
    }

    crate::record! {
        #[derive(Debug, Clone, PartialEq)]
        pub struct Inner {
            pub value: String,
        }
    }

    crate::record! {
        #[derive(Debug, Clone, PartialEq)]
        pub struct Outer {
            pub inner: Inner,
        }
    }

    crate::record! {
        #[derive(Debug, Clone, PartialEq)]
        pub struct Item {
            pub id: i64,
        }
    }

    crate::record! {
        #[derive(Debug, Clone, PartialEq)]
        pub struct Holder {
            pub items: Vec<Item>,
        }
    }

    crate::record! {
        #[derive(Debug, Clone, PartialEq)]
        pub struct Counter {
            pub count: i64 = 0,
        }
    }

    crate::record! {
        #[derive(Debug, Clone, PartialEq)]
        pub struct Person {
            pub name: String,
        }
    }

    crate::record! {
        #[derive(Debug, Clone, PartialEq)]
        pub struct Settings {
            pub some_field: i64,
        }
    }

    crate::record! {
        #[derive(Debug, Clone, PartialEq)]
        pub struct Empty {
            pub default: String = "allowed",
        }
    }

    crate::record! {
        #[derive(Debug, Clone, PartialEq)]
        pub struct Structure {
            pub contents: BTreeMap<String, Point>,
        }
    }

    crate::record! {
        #[derive(Debug, Clone, PartialEq)]
        pub struct Relevant {
            pub key: String,
        }
    }

    crate::record! {
        #[derive(Debug, Clone, PartialEq)]
        pub struct OptionalRelevant {
            pub key: Option<String>,
        }
    }

    crate::record! {
        #[derive(Debug, Clone, PartialEq)]
        pub struct Irrelevant {
            pub key: Table,
        }
    }

    crate::record! {
        #[derive(Debug, Clone, PartialEq)]
        pub struct TooLong {
            pub kind: String,
        }
    }

    // Self-referential: a required child only ends when the data runs out.
    crate::record! {
        #[derive(Debug, Clone, PartialEq)]
        pub struct Node {
            pub name: String,
            pub child: Box<Node>,
        }
    }

    crate::record! {
        #[derive(Debug, Clone, PartialEq)]
        pub struct Chain {
            pub value: i64,
            pub next: Option<Box<Chain>>,
        }
    }

    // -- The sample tool config ---------------------------------------------

    crate::record! {
        #[derive(Debug, Clone)]
        pub struct First {
            pub string: String,
            pub list_of_string: Vec<String>,
            pub list_of_int: Vec<i64>,
            pub list_of_float: Vec<f64>,
            pub list_of_numbers: Vec<Either<i64, f64>>,
            pub some_boolean: bool,
            pub number: Either<f64, i64>,
            pub not_a_number: f64,
            pub datetime: Datetime,
            pub datetimes: Vec<Datetime>,
            pub extra: Option<Table>,
        }
    }

    crate::record! {
        #[derive(Debug, Clone, PartialEq)]
        pub struct FruitDetails {
            pub color: String,
            pub shape: String,
        }
    }

    crate::record! {
        #[derive(Debug, Clone, PartialEq)]
        pub struct SecondExtra {
            pub allowed: bool,
        }
    }

    crate::record! {
        #[derive(Debug, Clone)]
        pub struct Tool {
            pub first: First,
            pub fruits: Vec<Fruit>,
            pub second_extra: SecondExtra,
        }
    }

    /// Base declaration shared by named records.
    pub fn abs_has_name() -> Schema {
        Schema::new("AbsHasName").field(FieldDecl::new("name", String::descriptor()))
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct FruitVariety {
        pub name: String,
    }

    impl Record for FruitVariety {
        const NAME: &'static str = "FruitVariety";

        fn schema() -> Schema {
            Schema::new(Self::NAME).extends(abs_has_name())
        }

        fn from_fields(mut fields: Fields) -> Result<Self, ConfigError> {
            Ok(Self {
                name: fields.take("name")?,
            })
        }

        fn set_field(&mut self, name: &str, value: Resolved) -> Result<(), ConfigError> {
            match name {
                "name" => self.name = convert(Self::NAME, name, value)?,
                other => {
                    return Err(ConfigError::UnknownField {
                        record: Self::NAME.into(),
                        field: other.into(),
                    });
                }
            }
            Ok(())
        }
    }

    impl Typed for FruitVariety {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::record::<Self>()
        }
    }

    impl FromResolved for FruitVariety {
        fn from_resolved(value: Resolved) -> Result<Self, Resolved> {
            value.into_record()
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Fruit {
        pub name: String,
        pub varieties: Vec<FruitVariety>,
        pub physical: Option<FruitDetails>,
    }

    impl Record for Fruit {
        const NAME: &'static str = "Fruit";

        fn schema() -> Schema {
            Schema::new(Self::NAME)
                .extends(abs_has_name())
                .field(FieldDecl::new("varieties", Vec::<FruitVariety>::descriptor()))
                .field(FieldDecl::new("physical", Option::<FruitDetails>::descriptor()))
        }

        fn from_fields(mut fields: Fields) -> Result<Self, ConfigError> {
            Ok(Self {
                name: fields.take("name")?,
                varieties: fields.take("varieties")?,
                physical: fields.take("physical")?,
            })
        }

        fn set_field(&mut self, name: &str, value: Resolved) -> Result<(), ConfigError> {
            match name {
                "name" => self.name = convert(Self::NAME, name, value)?,
                "varieties" => self.varieties = convert(Self::NAME, name, value)?,
                "physical" => self.physical = convert(Self::NAME, name, value)?,
                other => {
                    return Err(ConfigError::UnknownField {
                        record: Self::NAME.into(),
                        field: other.into(),
                    });
                }
            }
            Ok(())
        }
    }

    impl Typed for Fruit {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::record::<Self>()
        }
    }

    impl FromResolved for Fruit {
        fn from_resolved(value: Resolved) -> Result<Self, Resolved> {
            value.into_record()
        }
    }

    /// A tool whose constructor takes its own argument and sets `more_props`.
    #[derive(Debug, Default)]
    pub struct ToolWithInit {
        pub more_props: String,
        pub first: Option<First>,
        pub fruits: Vec<Fruit>,
        pub second_extra: Option<SecondExtra>,
    }

    impl ToolWithInit {
        pub fn new(more_properties: &str) -> Self {
            Self {
                more_props: more_properties.to_string(),
                ..Self::default()
            }
        }
    }

    impl Record for ToolWithInit {
        const NAME: &'static str = "ToolWithInit";
        const SHAPE: Shape = Shape::Custom;

        fn schema() -> Schema {
            Schema::new(Self::NAME)
                .extends(Tool::schema())
                .field(FieldDecl::new("more_props", String::descriptor()))
        }

        fn from_fields(mut fields: Fields) -> Result<Self, ConfigError> {
            let more_properties: String = fields.take("more_properties")?;
            Ok(Self::new(&more_properties))
        }

        fn set_field(&mut self, name: &str, value: Resolved) -> Result<(), ConfigError> {
            match name {
                "more_props" => self.more_props = convert(Self::NAME, name, value)?,
                "first" => self.first = Some(convert(Self::NAME, name, value)?),
                "fruits" => self.fruits = convert(Self::NAME, name, value)?,
                "second_extra" => self.second_extra = Some(convert(Self::NAME, name, value)?),
                other => {
                    return Err(ConfigError::UnknownField {
                        record: Self::NAME.into(),
                        field: other.into(),
                    });
                }
            }
            Ok(())
        }

        fn assigned_fields(&self) -> Vec<String> {
            vec!["more_props".to_string()]
        }
    }

    #[test]
    fn sample_toml_parses() {
        let tool = sample_tool();
        assert!(tool.contains_key("first"));
        assert!(tool.contains_key("second-extra"));
    }

    #[test]
    fn fixture_schemas_inherit_name() {
        let fields = crate::schema::collect(&Fruit::schema(), &Default::default());
        let names: Vec<_> = fields.names().collect();
        assert_eq!(names, vec!["name", "varieties", "physical"]);
    }
}
