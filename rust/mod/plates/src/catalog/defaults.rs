use crate::model::{EquipmentRule, NumberRange};

fn rule(id: &str, name: &str, ranges: &[(u32, u32)], est_annual_usage: u32) -> EquipmentRule {
    EquipmentRule {
        id: id.into(),
        name: name.into(),
        ranges: ranges.iter().map(|&(s, e)| NumberRange::new(s, e)).collect(),
        est_annual_usage,
    }
}

/// The built-in equipment catalog.
///
/// Estimated usages are starting points; they are superseded by history
/// after three years or by pinned overrides.
pub(super) fn default_rules() -> Vec<EquipmentRule> {
    vec![
        rule("chave-tripolar-sem-corte", "Chave Tripolar Sem Corte Visível", &[(1, 99)], 20),
        rule("seccionalizador", "Seccionalizador", &[(100, 199)], 30),
        rule(
            "chave-fusivel-capacitor",
            "Chave Fusível de Capacitor",
            &[(200, 299), (85000, 85199)],
            50,
        ),
        rule("regulador-tensao", "Regulador de Tensão", &[(300, 399)], 15),
        rule(
            "chave-tripolar-corte-visivel",
            "Chave Tripolar com Corte Visível",
            &[(400, 499)],
            25,
        ),
        rule("religador-rede", "Religador da Rede", &[(500, 599), (86500, 86999)], 40),
        rule(
            "chave-fusivel-religadora",
            "Chave Fusível Religadora",
            &[(600, 799), (82000, 82999)],
            80,
        ),
        rule(
            "chave-faca-unipolar-carga",
            "Chave Faca Unipolar – Abertura com Carga",
            &[(800, 2899), (84000, 84999), (90000, 90999)],
            500,
        ),
        rule(
            "chave-faca-unipolar-sem-carga",
            "Chave Faca Unipolar – Abertura sem Carga",
            &[(2900, 2999), (97800, 97999)],
            100,
        ),
        rule(
            "chave-fusivel-ramal",
            "Chave Fusível de Ramal",
            &[(3000, 4999), (80000, 81999), (87000, 88999)],
            800,
        ),
        rule("chave-fusivel-trafo", "Chave Fusível de Trafo", &[(5000, 69999)], 2000),
        rule(
            "chave-fusivel-ramal-particular",
            "Chave Fusível de Ramal Particular",
            &[(70000, 79999)],
            300,
        ),
        rule(
            "chave-faca-ramal-particular",
            "Chave Faca de Ramal Particular",
            &[(85200, 85699)],
            100,
        ),
        rule(
            "seccionalizador-ramal-particular",
            "Seccionalizador para Ramal Particular",
            &[(85700, 85999)],
            50,
        ),
        rule(
            "chave-base-fusivel-lamina",
            "Chave Base Fusível com Lâmina Seccionadora",
            &[(83000, 83999)],
            60,
        ),
        rule(
            "disjuntor-pvo",
            "Disjuntor a Pequeno Volume de Óleo (DJ PVO)",
            &[(86000, 86499)],
            20,
        ),
        rule(
            "trip-saver",
            "Chave Religadora Eletrônica (Trip Saver)",
            &[(89000, 89199), (89400, 89999)],
            150,
        ),
        rule("chave-unid-geradora", "Chave Unid Geradora", &[(89200, 89399)], 40),
        rule("chave-tripolar", "Chave Tripolar", &[(98999, 99999)], 100),
        rule("religador-particular", "Religador Particular", &[(98000, 98998)], 50),
        rule("reserva-tecnica", "Reserva Técnica", &[(91000, 97799)], 1000),
    ]
}
