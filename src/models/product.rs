use serde::{Deserialize, Serialize};
use validator::Validate;

// 校验规则与 llm::contract 中声明的 schema 一一对应（minimum / minLength）。
// serde_json 不会解析出 NaN/Inf，数值无需再做有限性检查。

/// 标签
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
}

/// 商品规格（名称 + 价格）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Variation {
    pub name: String,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
}

/// 模型识别出的单个商品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[validate(length(min = 1, message = "product name must not be empty"))]
    pub name: String,
    #[validate(range(min = 0.0))]
    pub default_price: f64,
    pub description: String,
    pub reference: String,
    pub ncm: String,
    pub tags: Vec<Tag>,
    #[validate(nested)]
    pub variation: Vec<Variation>,
    pub unit: String,
    #[validate(range(min = 0.0))]
    pub aliquota_icms: f64,
    pub cst_icms: String,
    #[validate(range(min = 0.0))]
    pub aliquota_pis: f64,
    pub cst_pis: String,
    #[validate(range(min = 0.0))]
    pub aliquota_cofins: f64,
    pub cst_cofins: String,
    #[validate(range(min = 0.0))]
    pub aliquota_ipi: f64,
    pub csosn: String,
    pub origem: String,
    #[validate(range(min = 0.0))]
    pub idx_reducao_base_calculo: f64,
    pub cod_beneficio_fiscal: String,
    pub cod_especificador_subst_trib_cest: String,
    pub cfop: String,
    #[validate(range(min = 0.0))]
    pub margem_valor_agregado: f64,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn product(name: &str, price: f64) -> ProductRecord {
        ProductRecord {
            name: name.to_string(),
            default_price: price,
            description: "Refrigerante de cola".to_string(),
            reference: "1001".to_string(),
            ncm: "22021000".to_string(),
            tags: vec![Tag { name: "bebida".to_string() }],
            variation: vec![Variation { name: "lata 350ml".to_string(), price: 4.5 }],
            unit: "UN".to_string(),
            aliquota_icms: 18.0,
            cst_icms: "060".to_string(),
            aliquota_pis: 0.0,
            cst_pis: "04".to_string(),
            aliquota_cofins: 0.0,
            cst_cofins: "04".to_string(),
            aliquota_ipi: 0.0,
            csosn: "500".to_string(),
            origem: "0".to_string(),
            idx_reducao_base_calculo: 0.0,
            cod_beneficio_fiscal: "".to_string(),
            cod_especificador_subst_trib_cest: "0300700".to_string(),
            cfop: "5405".to_string(),
            margem_valor_agregado: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::product;
    use super::*;

    #[test]
    fn uses_camel_case_on_the_wire() {
        let json = serde_json::to_value(product("Coca-Cola", 9.9)).unwrap();
        assert_eq!(json["defaultPrice"], 9.9);
        assert_eq!(json["codEspecificadorSubstTribCest"], "0300700");
        assert!(json.get("default_price").is_none());
    }

    #[test]
    fn rejects_negative_price() {
        let err = product("Coca-Cola", -1.0).validate().unwrap_err();
        assert_eq!(err.field_errors().len(), 1);
    }

    #[test]
    fn rejects_empty_name() {
        assert!(product("", 1.0).validate().is_err());
    }

    #[test]
    fn rejects_negative_variation_price() {
        let mut p = product("Coca-Cola", 9.9);
        p.variation[0].price = -4.5;
        assert!(p.validate().is_err());
    }

    #[test]
    fn zero_tax_fields_are_valid() {
        assert!(product("Coca-Cola", 0.0).validate().is_ok());
    }

    #[test]
    fn blank_strings_outside_name_are_valid() {
        let mut p = product("Coca-Cola", 9.9);
        p.cod_beneficio_fiscal = String::new();
        p.tags = vec![Tag { name: String::new() }];
        assert!(p.validate().is_ok());
    }
}
