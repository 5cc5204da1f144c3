//! Canonical field definitions and header alias tables
//!
//! Every canonical field carries an ordered list of header aliases as they
//! appear in the monthly extracts of the different providers. Aliases are
//! written pre-folded (uppercase, no diacritics) and matched against folded
//! header text, so `Presión Sistólica` in a source file still resolves.

/// A canonical field and the header names it may appear under
///
/// Alias order is resolution order: the first alias found among the headers
/// fixes the column for the whole run.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    /// Canonical key, the stable name the rest of the engine uses
    pub key: &'static str,
    /// Ordered header aliases, pre-folded
    pub aliases: &'static [&'static str],
}

/// Grouping fields shared by the extract and the population reference
pub const GROUPING_KEYS: [&str; 3] = ["departamento", "municipio", "prestador"];

/// Canonical fields of the monthly extract, in reporting order
pub const CANONICAL_FIELDS: [FieldDef; 24] = [
    FieldDef {
        key: "departamento",
        aliases: &["DEPARTAMENTO", "DPTO", "DEPTO", "DEPARTAMENTO DE RESIDENCIA"],
    },
    FieldDef {
        key: "municipio",
        aliases: &["MUNICIPIO", "MPIO", "MUNICIPIO DE RESIDENCIA", "CIUDAD"],
    },
    FieldDef {
        key: "prestador",
        aliases: &["PRESTADOR", "IPS", "IPS PRIMARIA", "NOMBRE IPS", "PRESTADOR PRIMARIO"],
    },
    FieldDef {
        key: "eps",
        aliases: &["EPS", "EAPB", "ASEGURADORA"],
    },
    FieldDef {
        key: "regimen",
        aliases: &["REGIMEN", "REGIMEN DE AFILIACION", "TIPO DE REGIMEN"],
    },
    FieldDef {
        key: "tipo_identificacion",
        aliases: &[
            "TIPO DE IDENTIFICACION",
            "TIPO IDENTIFICACION",
            "TIPO DE DOCUMENTO",
            "TIPO DOC",
        ],
    },
    FieldDef {
        key: "identificacion",
        aliases: &[
            "IDENTIFICACION",
            "NUMERO DE IDENTIFICACION",
            "NUMERO DE DOCUMENTO",
            "DOCUMENTO",
        ],
    },
    FieldDef {
        key: "sexo",
        aliases: &["SEXO", "GENERO"],
    },
    FieldDef {
        key: "edad",
        aliases: &["EDAD", "EDAD ANOS", "EDAD (ANOS)", "EDAD EN ANOS"],
    },
    FieldDef {
        key: "fecha_nacimiento",
        aliases: &["FECHA DE NACIMIENTO", "FECHA NACIMIENTO", "FECHA NAC"],
    },
    FieldDef {
        key: "fecha_diagnostico",
        aliases: &["FECHA DE DIAGNOSTICO", "FECHA DIAGNOSTICO", "FECHA DX"],
    },
    FieldDef {
        key: "hta",
        aliases: &["HTA", "DIAGNOSTICO HTA", "DX HTA", "HIPERTENSION"],
    },
    FieldDef {
        key: "dm",
        aliases: &["DM", "DIAGNOSTICO DM", "DX DM", "DIABETES"],
    },
    FieldDef {
        key: "tension_sistolica",
        aliases: &[
            "TENSION SISTOLICA",
            "ULTIMA TENSION SISTOLICA",
            "TA SISTOLICA",
            "PRESION SISTOLICA",
            "TAS",
        ],
    },
    FieldDef {
        key: "tension_diastolica",
        aliases: &[
            "TENSION DIASTOLICA",
            "ULTIMA TENSION DIASTOLICA",
            "TA DIASTOLICA",
            "PRESION DIASTOLICA",
            "TAD",
        ],
    },
    FieldDef {
        key: "fecha_ultima_toma",
        aliases: &[
            "FECHA ULTIMA TOMA",
            "FECHA ULTIMA TOMA TA",
            "FECHA ULTIMA TENSION",
            "FECHA TOMA TENSION ARTERIAL",
        ],
    },
    FieldDef {
        key: "hba1c",
        aliases: &[
            "HBA1C",
            "RESULTADO HBA1C",
            "VALOR HBA1C",
            "HEMOGLOBINA GLICOSILADA",
        ],
    },
    FieldDef {
        key: "fecha_hba1c",
        aliases: &[
            "FECHA HBA1C",
            "FECHA DE HBA1C",
            "FECHA TOMA HBA1C",
            "FECHA HEMOGLOBINA GLICOSILADA",
        ],
    },
    FieldDef {
        key: "creatinina",
        aliases: &["CREATININA", "RESULTADO CREATININA", "VALOR CREATININA"],
    },
    FieldDef {
        key: "fecha_creatinina",
        aliases: &[
            "FECHA CREATININA",
            "FECHA DE CREATININA",
            "FECHA TOMA CREATININA",
        ],
    },
    FieldDef {
        key: "microalbuminuria",
        aliases: &["MICROALBUMINURIA", "RESULTADO MICROALBUMINURIA"],
    },
    FieldDef {
        key: "fecha_microalbuminuria",
        aliases: &[
            "FECHA MICROALBUMINURIA",
            "FECHA DE MICROALBUMINURIA",
            "FECHA TOMA MICROALBUMINURIA",
        ],
    },
    FieldDef {
        key: "estadio_erc",
        aliases: &[
            "ESTADIO ERC",
            "ESTADIO",
            "CLASIFICACION ERC",
            "ESTADIO ENFERMEDAD RENAL CRONICA",
        ],
    },
    FieldDef {
        key: "tfg",
        aliases: &["TFG", "TFG ACTUAL", "TASA DE FILTRACION GLOMERULAR", "EGFR"],
    },
];

/// Required columns of the population reference file
pub const POPULATION_FIELDS: [FieldDef; 5] = [
    FieldDef {
        key: "departamento",
        aliases: &["DEPARTAMENTO", "DPTO", "DEPTO"],
    },
    FieldDef {
        key: "municipio",
        aliases: &["MUNICIPIO", "MPIO", "CIUDAD"],
    },
    FieldDef {
        key: "prestador",
        aliases: &["PRESTADOR", "IPS", "IPS PRIMARIA", "NOMBRE IPS"],
    },
    FieldDef {
        key: "poblacion_hta",
        aliases: &["POBLACION HTA", "POBLACION HIPERTENSION", "POB HTA", "HTA"],
    },
    FieldDef {
        key: "poblacion_dm",
        aliases: &["POBLACION DM", "POBLACION DIABETES", "POB DM", "DM"],
    },
];
