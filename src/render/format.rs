use crate::models::ProductRecord;

/// 按 pt-BR 货币格式输出: 19.9 -> "R$ 19,90", 1234.5 -> "R$ 1.234,50"
pub fn format_brl(value: f64) -> String {
    if !value.is_finite() {
        return "R$ 0,00".to_string();
    }
    let cents = round_to_cents(value.abs());
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{}R$ {},{:02}",
        sign,
        group_thousands(cents / 100),
        cents % 100
    )
}

// {:.2} 按精确十进制值舍入，但恰好半分时取偶数；pt-BR 格式化在半分时远离零
fn round_to_cents(abs: f64) -> u128 {
    let eighths = abs.fract() * 8.0;
    if eighths.fract() == 0.0 && (eighths as u64) % 2 == 1 {
        return (abs * 100.0).round() as u128;
    }
    format!("{:.2}", abs).replace('.', "").parse().unwrap_or(0)
}

fn group_thousands(n: u128) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// "unidade" (任意大小写) 显示为 "UN"，其余原样
pub fn normalize_unit(unit: &str) -> &str {
    if unit.to_uppercase() == "UNIDADE" {
        "UN"
    } else {
        unit
    }
}

/// 单个商品的展示数据
#[derive(Debug, Clone, PartialEq)]
pub struct ProductView {
    pub name: String,
    pub description: String,
    pub price: String,
    pub reference: String,
    pub ncm: String,
    pub tags: Vec<String>,
    pub variations: Vec<String>,
    pub unit: String,
    /// (标签, 原样取值)
    pub tax_fields: Vec<(&'static str, String)>,
}

impl From<&ProductRecord> for ProductView {
    fn from(p: &ProductRecord) -> Self {
        Self {
            name: p.name.clone(),
            description: p.description.clone(),
            price: format_brl(p.default_price),
            reference: p.reference.clone(),
            ncm: p.ncm.clone(),
            tags: p.tags.iter().map(|t| t.name.to_uppercase()).collect(),
            variations: p
                .variation
                .iter()
                .map(|v| format!("{} - {}", v.name.to_uppercase(), format_brl(v.price)))
                .collect(),
            unit: normalize_unit(&p.unit).to_string(),
            tax_fields: vec![
                ("Aliquota ICMS", p.aliquota_icms.to_string()),
                ("CST ICMS", p.cst_icms.clone()),
                ("Aliquota PIS", p.aliquota_pis.to_string()),
                ("CST PIS", p.cst_pis.clone()),
                ("Aliquota COFINS", p.aliquota_cofins.to_string()),
                ("CST COFINS", p.cst_cofins.clone()),
                ("Aliquota IPI", p.aliquota_ipi.to_string()),
                ("CSOSN", p.csosn.clone()),
                ("Origem", p.origem.clone()),
                ("Índice de Redução da Base de Cálculo", p.idx_reducao_base_calculo.to_string()),
                ("Código de Benefício Fiscal", p.cod_beneficio_fiscal.clone()),
                (
                    "Código Especificador de Substituição Tributária (CEST)",
                    p.cod_especificador_subst_trib_cest.clone(),
                ),
                ("CFOP", p.cfop.clone()),
                ("Margem de Valor Agregado", p.margem_valor_agregado.to_string()),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::fixtures::product;
    use crate::models::{Tag, Variation};

    #[test]
    fn formats_brl() {
        assert_eq!(format_brl(19.9), "R$ 19,90");
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(4.5), "R$ 4,50");
        assert_eq!(format_brl(1234.5), "R$ 1.234,50");
        assert_eq!(format_brl(1234567.891), "R$ 1.234.567,89");
        assert_eq!(format_brl(999.999), "R$ 1.000,00");
        assert_eq!(format_brl(-5.0), "-R$ 5,00");
    }

    #[test]
    fn rounds_from_exact_decimal_value() {
        // 0.015 和 2.675 的二进制值略小于半分
        assert_eq!(format_brl(0.015), "R$ 0,01");
        assert_eq!(format_brl(2.675), "R$ 2,67");
        assert_eq!(format_brl(1.005), "R$ 1,00");
        // 恰好半分时远离零
        assert_eq!(format_brl(0.125), "R$ 0,13");
        assert_eq!(format_brl(2.375), "R$ 2,38");
        assert_eq!(format_brl(-0.125), "-R$ 0,13");
    }

    #[test]
    fn normalizes_unidade_only() {
        assert_eq!(normalize_unit("unidade"), "UN");
        assert_eq!(normalize_unit("UNIDADE"), "UN");
        assert_eq!(normalize_unit("Unidade"), "UN");
        assert_eq!(normalize_unit("kg"), "kg");
        assert_eq!(normalize_unit("UN"), "UN");
        assert_eq!(normalize_unit("unidades"), "unidades");
    }

    #[test]
    fn view_uppercases_tags_and_variations() {
        let mut p = product("Camiseta", 49.9);
        p.tags = vec![Tag { name: "azul".into() }, Tag { name: "algodão".into() }];
        p.variation = vec![Variation { name: "tamanho p".into(), price: 45.0 }];
        p.unit = "unidade".into();

        let view = ProductView::from(&p);
        assert_eq!(view.price, "R$ 49,90");
        assert_eq!(view.tags, vec!["AZUL", "ALGODÃO"]);
        assert_eq!(view.variations, vec!["TAMANHO P - R$ 45,00"]);
        assert_eq!(view.unit, "UN");
    }

    #[test]
    fn view_keeps_tax_fields_verbatim() {
        let mut p = product("Detergente", 3.49);
        p.aliquota_pis = 0.65;
        p.aliquota_cofins = 3.0;
        let view = ProductView::from(&p);
        let get = |label: &str| {
            view.tax_fields
                .iter()
                .find(|(l, _)| *l == label)
                .map(|(_, v)| v.as_str())
                .unwrap()
        };
        assert_eq!(get("Aliquota ICMS"), "18");
        assert_eq!(get("Aliquota PIS"), "0.65");
        assert_eq!(get("Aliquota COFINS"), "3");
        assert_eq!(get("CFOP"), "5405");
        assert_eq!(get("Código de Benefício Fiscal"), "");
        assert_eq!(view.ncm, "22021000");
    }
}
