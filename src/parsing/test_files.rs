
use noodles::bgzf;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::writers::noodles_idx::index_vcf;

/// Header shared by all test VCFs; chr3 is declared but never has records
const TEST_HEADER: &str = "##fileformat=VCFv4.3
##INFO=<ID=AF,Number=A,Type=Float,Description=\"Allele frequency\">
##contig=<ID=chr1>
##contig=<ID=chr2>
##contig=<ID=chr3>
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO
";

/// Writes a bgzipped VCF from raw data lines, without indexing it.
/// # Arguments
/// * `folder` - where to write the file
/// * `name` - file name, should end in `.vcf.gz`
/// * `lines` - tab-delimited data lines, without newlines
pub fn write_vcf_lines(folder: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let vcf_fn = folder.join(name);
    let mut writer = bgzf::io::Writer::new(File::create(&vcf_fn).unwrap());
    writer.write_all(TEST_HEADER.as_bytes()).unwrap();
    for line in lines.iter() {
        writeln!(writer, "{line}").unwrap();
    }
    writer.finish().unwrap();
    vcf_fn
}

/// Same as `write_vcf_lines`, but also writes a tabix index next to the file.
/// Lines must already be sorted by contig and position.
pub fn write_indexed_vcf_lines(folder: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let vcf_fn = write_vcf_lines(folder, name, lines);
    index_vcf(&vcf_fn).unwrap();
    vcf_fn
}

/// Writes a sites-only, bgzipped VCF with a tabix index next to it.
/// Records must already be sorted by contig and position.
/// # Arguments
/// * `folder` - where to write the file
/// * `name` - file name, should end in `.vcf.gz`
/// * `records` - (contig, position, REF, ALT)
pub fn write_indexed_vcf(folder: &Path, name: &str, records: &[(&str, u64, &str, &str)]) -> PathBuf {
    let lines: Vec<String> = records.iter()
        .map(|(contig, position, ref_allele, alt_allele)| format!("{contig}\t{position}\t.\t{ref_allele}\t{alt_allele}\t.\t.\t."))
        .collect();
    let lines: Vec<&str> = lines.iter().map(|l| l.as_str()).collect();
    write_indexed_vcf_lines(folder, name, &lines)
}
