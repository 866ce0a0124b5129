use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pcq_xgmml::io::xgmml::XGMMLWriter;
use pcq_xgmml::model::ClassificationCase;
use pcq_xgmml::{
    ColorScaler, ExportParameters, GraphBuilder, NoAnnotations, PeptideNode, ProteinCluster,
    ProteinNode, ProteinPair, QuantifiedPeptide, Ratio,
};

/// A chain of `n_proteins` proteins where each neighbouring pair shares a peptide
fn synthetic_cluster(offset: usize, n_proteins: usize) -> ProteinCluster {
    let mut cluster = ProteinCluster::new();
    let proteins: Vec<_> = (0..n_proteins)
        .map(|i| cluster.add_protein_node(ProteinNode::new([format!("P{:05}", offset + i)])))
        .collect();
    for (i, protein) in proteins.iter().enumerate() {
        let sequence = format!("UNIQ{}PEPTIDE{}K", offset, i);
        let ratio = (i as f64 - n_proteins as f64 / 2.0) / 2.0;
        let unique = cluster.add_peptide_node(
            PeptideNode::new(vec![QuantifiedPeptide::new(sequence)])
                .with_consensus_ratio(Ratio::new(ratio)),
        );
        cluster.link(*protein, unique).unwrap();
        if i + 1 < n_proteins {
            let sequence = format!("SHARED{}PEPTIDE{}R", offset, i);
            let peptide = cluster.add_peptide_node(
                PeptideNode::new(vec![QuantifiedPeptide::new(sequence)])
                    .with_consensus_ratio(Ratio::new(-ratio)),
            );
            cluster.link(*protein, peptide).unwrap();
            cluster.link(proteins[i + 1], peptide).unwrap();
        }
    }
    for pair in proteins.windows(2) {
        cluster.add_pair(
            ProteinPair::new(pair[0], pair[1]).with_cases([ClassificationCase::Consistent]),
        );
    }
    cluster
}

fn build_and_scale(params: &ExportParameters, clusters: &[ProteinCluster]) -> usize {
    let mut builder = GraphBuilder::new(params, &NoAnnotations);
    let mut graph = builder.build("bench", clusters).unwrap();
    ColorScaler::new(params).scale(&mut graph);
    graph.nodes.len()
}

fn build_scale_and_write(params: &ExportParameters, clusters: &[ProteinCluster]) -> usize {
    let mut builder = GraphBuilder::new(params, &NoAnnotations);
    let mut graph = builder.build("bench", clusters).unwrap();
    ColorScaler::new(params).scale(&mut graph);
    let mut writer = XGMMLWriter::new(Vec::new());
    writer.write_graph(&graph).unwrap();
    writer.into_inner().unwrap().len()
}

fn export_pipeline(c: &mut Criterion) {
    let params = ExportParameters::default().with_ratio_bounds(-5.0, 5.0);
    let clusters: Vec<ProteinCluster> = (0..200).map(|i| synthetic_cluster(i * 10, 8)).collect();
    c.bench_function("build_and_scale", |b| {
        b.iter(|| build_and_scale(black_box(&params), black_box(&clusters)))
    });
    c.bench_function("build_scale_and_write", |b| {
        b.iter(|| build_scale_and_write(black_box(&params), black_box(&clusters)))
    });
}

criterion_group!(benches, export_pipeline);
criterion_main!(benches);
