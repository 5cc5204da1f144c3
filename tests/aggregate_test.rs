//! Tests for the aggregation engine invariants

use indicator_engine::pipeline::progress::NoopProgress;
use indicator_engine::{
    CellValue, DataMatrix, EngineConfig, GroupKey, Indicator, Pipeline, PopulationIndex,
    RunParameters,
};

fn text_row(cells: &[&str]) -> Vec<CellValue> {
    cells
        .iter()
        .map(|c| {
            if c.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text((*c).to_string())
            }
        })
        .collect()
}

const HEADERS: &[&str] = &[
    "DEPARTAMENTO",
    "MUNICIPIO",
    "PRESTADOR",
    "EDAD",
    "HTA",
    "DM",
    "TENSION SISTOLICA",
    "TENSION DIASTOLICA",
    "FECHA ULTIMA TOMA",
    "HBA1C",
    "FECHA HBA1C",
    "FECHA CREATININA",
    "FECHA MICROALBUMINURIA",
    "ESTADIO ERC",
];

/// A mixed matrix spanning two provider groups plus one row with an
/// unresolvable municipality
fn sample_matrix() -> DataMatrix {
    DataMatrix {
        headers: text_row(HEADERS),
        rows: vec![
            // controlled hypertensive, IPS Norte
            text_row(&[
                "Antioquia", "Medellín", "IPS Norte", "45", "SI", "NO", "130", "85",
                "15/05/2024", "", "", "10/03/2024", "", "ESTADIO 2",
            ]),
            // uncontrolled 60+, IPS Norte, last seen before the window
            text_row(&[
                "Antioquia", "Medellín", "IPS Norte", "72", "SI", "NO", "160", "95",
                "20/11/2023", "", "", "", "", "",
            ]),
            // diabetic under control, IPS Sur
            text_row(&[
                "Antioquia", "Envigado", "IPS Sur", "55", "NO", "SI", "", "",
                "", "6,5", "10/04/2024", "05/02/2024", "15/09/2023", "ESTADIO 1",
            ]),
            // blank municipality lands in the N/A bucket
            text_row(&[
                "Antioquia", "", "IPS Sur", "63", "SI", "NO", "140", "80",
                "12/06/2024", "", "", "", "", "",
            ]),
        ],
    }
}

fn sample_population() -> PopulationIndex {
    PopulationIndex::parse(
        "DEPARTAMENTO;MUNICIPIO;PRESTADOR;POBLACION HTA;POBLACION DM\n\
         Antioquia;Medellín;IPS Norte;120;40\n\
         Antioquia;Envigado;IPS Sur;80;30\n\
         Antioquia;Rionegro;IPS Oriente;50;10\n",
    )
    .unwrap()
}

fn run() -> indicator_engine::ProcessingResult {
    let pipeline = Pipeline::new(EngineConfig::default());
    pipeline
        .run_with_index(
            sample_matrix(),
            &sample_population(),
            &RunParameters {
                year: 2024,
                cutoff_month: 7,
            },
            &mut NoopProgress,
        )
        .unwrap()
}

#[test]
fn test_group_sums_equal_global_for_row_derived_indicators() {
    let result = run();
    for indicator in Indicator::ALL {
        if indicator.population_derived() {
            continue;
        }
        let group_sum: u64 = result.groups.iter().map(|g| g.indicators.get(indicator)).sum();
        assert_eq!(
            group_sum,
            result.totals.get(indicator),
            "indicator {} diverges between groups and global",
            indicator.key()
        );
    }
    let group_rows: u64 = result.groups.iter().map(|g| g.row_count).sum();
    assert_eq!(group_rows, result.row_count);
}

#[test]
fn test_population_denominators_are_looked_up_not_row_summed() {
    let result = run();

    // the global value is the reference grand total, including the
    // IPS Oriente key no row ever touched
    assert_eq!(result.totals.get(Indicator::PoblacionHta), 250);
    assert_eq!(result.totals.get(Indicator::PoblacionDm), 80);

    let norte = result
        .groups
        .iter()
        .find(|g| g.key == GroupKey::new("Antioquia", "Medellín", "IPS Norte"))
        .unwrap();
    assert_eq!(norte.indicators.get(Indicator::PoblacionHta), 120);
    assert_eq!(norte.indicators.get(Indicator::PoblacionDm), 40);

    // a group absent from the reference keeps zero denominators
    let na = result
        .groups
        .iter()
        .find(|g| g.key.municipality == GroupKey::UNKNOWN)
        .unwrap();
    assert_eq!(na.indicators.get(Indicator::PoblacionHta), 0);
}

#[test]
fn test_rows_with_blank_grouping_cells_are_kept() {
    let result = run();
    assert_eq!(result.row_count, 4);

    let na = result
        .groups
        .iter()
        .find(|g| g.key.municipality == GroupKey::UNKNOWN)
        .unwrap();
    assert_eq!(na.row_count, 1);
    assert_eq!(na.key.department, "ANTIOQUIA");
    // the 63-year-old non-diabetic hypertensive counts in the 60+ rules
    assert_eq!(na.indicators.get(Indicator::Hta60MasDen), 1);
    assert_eq!(na.indicators.get(Indicator::Hta60MasNum), 1);
}

#[test]
fn test_groups_sorted_lexicographically() {
    let result = run();
    let keys: Vec<String> = result.groups.iter().map(|g| g.key.to_string()).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert_eq!(result.groups.len(), 3);
}

#[test]
fn test_indicator_counts_for_sample() {
    let result = run();
    assert_eq!(result.totals.get(Indicator::CaptacionHta), 2); // 45yo + 63yo
    assert_eq!(result.totals.get(Indicator::Hta1859Den), 1);
    assert_eq!(result.totals.get(Indicator::Hta1859Num), 1);
    assert_eq!(result.totals.get(Indicator::Hta60MasDen), 2); // 72yo + 63yo
    assert_eq!(result.totals.get(Indicator::Hta60MasNum), 1); // only the 63yo is controlled
    assert_eq!(result.totals.get(Indicator::CaptacionDm), 1);
    assert_eq!(result.totals.get(Indicator::DmControlDen), 1);
    assert_eq!(result.totals.get(Indicator::DmControlNum), 1);
    assert_eq!(result.totals.get(Indicator::CreatininaDen), 2);
    assert_eq!(result.totals.get(Indicator::CreatininaNum), 2);
    assert_eq!(result.totals.get(Indicator::Inasistentes), 1); // 72yo, stale reading
    assert_eq!(result.totals.get(Indicator::Estadio1), 1);
    assert_eq!(result.totals.get(Indicator::Estadio2), 1);
    assert_eq!(result.totals.get(Indicator::EstadioTotal), 2);
}
