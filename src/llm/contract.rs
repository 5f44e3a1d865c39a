use serde_json::{json, Map, Value};
use std::path::Path;

/// 内置提示词
pub const DEFAULT_PROMPT: &str = include_str!("../../prompts/analyze_product_image.txt");

// 约束须与 models::product 上的 #[validate] 保持一致
#[derive(Clone, Copy)]
enum Kind {
    Str,
    /// minLength = 1
    NonEmpty,
    /// minimum = 0
    Num,
}

const PRODUCT_FIELDS: &[(&str, Kind, &str)] = &[
    ("name", Kind::NonEmpty, "The name of the product."),
    ("defaultPrice", Kind::Num, "The default price of the product."),
    ("description", Kind::Str, "A detailed description of the product."),
    ("reference", Kind::Str, "The product reference code or ID."),
    ("ncm", Kind::Str, "The NCM (Mercosur Common Nomenclature) code for the product."),
    ("unit", Kind::Str, "The unit of measurement for the product."),
    ("aliquotaIcms", Kind::Num, "ICMS tax rate in percent."),
    ("cstIcms", Kind::Str, "ICMS Tax Situation Code."),
    ("aliquotaPis", Kind::Num, "PIS tax rate in percent."),
    ("cstPis", Kind::Str, "PIS Tax Situation Code."),
    ("aliquotaCofins", Kind::Num, "COFINS tax rate in percent."),
    ("cstCofins", Kind::Str, "COFINS Tax Situation Code."),
    ("aliquotaIpi", Kind::Num, "IPI tax rate in percent."),
    ("csosn", Kind::Str, "Tax Situation Code for Simples Nacional."),
    ("origem", Kind::Str, "Origin code."),
    ("idxReducaoBaseCalculo", Kind::Num, "ICMS calculation base reduction index."),
    ("codBeneficioFiscal", Kind::Str, "Tax Benefit Code."),
    ("codEspecificadorSubstTribCest", Kind::Str, "CEST Code (Tax Substitution Specification Code)."),
    ("cfop", Kind::Str, "Fiscal Operations Code."),
    ("margemValorAgregado", Kind::Num, "Added Value Margin."),
];

/// 固定提示词 + 结构化输出 schema，启动时构建一次，之后只读
#[derive(Debug, Clone)]
pub struct ExtractionContract {
    prompt: String,
    schema: Value,
}

impl Default for ExtractionContract {
    fn default() -> Self {
        Self::new(DEFAULT_PROMPT)
    }
}

impl ExtractionContract {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            schema: response_schema(),
        }
    }

    /// 从运维提供的文件加载提示词
    pub fn from_prompt_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let prompt = std::fs::read_to_string(path)?;
        Ok(Self::new(prompt))
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }
}

fn object(properties: Map<String, Value>, description: &str) -> Value {
    let required: Vec<Value> = properties.keys().cloned().map(Value::String).collect();
    json!({
        "type": "OBJECT",
        "description": description,
        "properties": properties,
        "required": required,
    })
}

fn field(kind: Kind, description: &str) -> Value {
    match kind {
        Kind::Str => json!({ "type": "STRING", "description": description }),
        Kind::NonEmpty => json!({ "type": "STRING", "description": description, "minLength": 1 }),
        Kind::Num => json!({ "type": "NUMBER", "description": description, "minimum": 0 }),
    }
}

fn product_schema() -> Value {
    let mut props = Map::new();
    for (name, kind, description) in PRODUCT_FIELDS {
        props.insert(name.to_string(), field(*kind, description));
    }

    let mut tag = Map::new();
    tag.insert("name".into(), field(Kind::Str, "The name of the tag."));
    props.insert(
        "tags".into(),
        json!({
            "type": "ARRAY",
            "description": "Up to 3 suggested tags for the product.",
            "items": object(tag, "A product tag."),
        }),
    );

    let mut variation = Map::new();
    variation.insert("name".into(), field(Kind::Str, "The name of the variation."));
    variation.insert("price".into(), field(Kind::Num, "The price of the variation."));
    props.insert(
        "variation".into(),
        json!({
            "type": "ARRAY",
            "description": "Up to 3 suggested variations for the product.",
            "items": object(variation, "A product variation."),
        }),
    );

    object(props, "A product identified in the image.")
}

/// { products: ProductRecord[] }
pub fn response_schema() -> Value {
    let mut props = Map::new();
    props.insert(
        "products".into(),
        json!({
            "type": "ARRAY",
            "description": "A list of products identified in the image, with their names, taxes and suggested prices.",
            "items": product_schema(),
        }),
    );
    object(props, "Products found in the photo.")
}
