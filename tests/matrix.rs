use std::fs;
use std::io::Write as _;
use std::path::Path;

use tempdir::TempDir;
use tfmatrix::dataset;
use tfmatrix::dataset::Class;
use tfmatrix::matrix::Writer;
use tfmatrix::record::hit::Config;
use tfmatrix::Matrix;
use tfmatrix::Schema;
use tfmatrix::Sink;

fn write_file(dir: &Path, name: &str, contents: &str) -> std::io::Result<std::path::PathBuf> {
    let path = dir.join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

/// Runs the whole tfSearch pipeline into `destination` and returns the
/// number of rows written.
fn build(
    control: &Path,
    query: &Path,
    destination: &Path,
) -> Result<usize, Box<dyn std::error::Error>> {
    let config = Config::default();
    let control = dataset::open_tfsearch(control, Class::Control, &config)?;
    let query = dataset::open_tfsearch(query, Class::Query, &config)?;
    let schema = Schema::from_datasets(&control, &query);

    let mut writer = Writer::new(Sink::create(destination)?);
    let rows = writer.write_matrix(&Matrix::new(&control, &query, &schema))?;
    writer.into_inner()?.commit()?;

    Ok(rows)
}

#[test]
fn test_single_hit_per_dataset() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new("tfmatrix")?;
    let control = write_file(dir.path(), "control.txt", "A1 x PWM1 name, :: 5(0.1)\n")?;
    let query = write_file(dir.path(), "query.txt", "B1 x PWM2 other, :: 2(0.1)\n")?;
    let output = dir.path().join("matrix.tsv");

    assert_eq!(build(&control, &query, &output)?, 2);
    assert_eq!(
        fs::read_to_string(&output)?,
        "Sequence\tPWM1 name\tPWM2 other\tTarget\n\
         A1\t5\t0\t0\n\
         B1\t0\t2\t1\n"
    );
    Ok(())
}

#[test]
fn test_empty_query() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new("tfmatrix")?;
    let control = write_file(
        dir.path(),
        "control.txt",
        "A1 x PWM1 name, :: 5(0.1)\nA2 x PWM3 third, :: 1(0.1)\n",
    )?;
    let query = write_file(dir.path(), "query.txt", "no hits were found\n")?;
    let output = dir.path().join("matrix.tsv");

    assert_eq!(build(&control, &query, &output)?, 2);
    assert_eq!(
        fs::read_to_string(&output)?,
        "Sequence\tPWM1 name\tPWM3 third\tTarget\n\
         A1\t5\t0\t0\n\
         A2\t0\t1\t0\n"
    );
    Ok(())
}

#[test]
fn test_shared_accession_appears_once_per_dataset() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new("tfmatrix")?;
    let control = write_file(
        dir.path(),
        "control.txt",
        "S1 x PWM1 name, :: 3(0.1)\nS1 x PWM1 name, :: 7(0.1)\n",
    )?;
    let query = write_file(dir.path(), "query.txt", "S1 x PWM1 name, :: 4(0.1)\n")?;
    let output = dir.path().join("matrix.tsv");

    assert_eq!(build(&control, &query, &output)?, 2);
    assert_eq!(
        fs::read_to_string(&output)?,
        "Sequence\tPWM1 name\tTarget\nS1\t7\t0\nS1\t4\t1\n"
    );
    Ok(())
}

#[test]
fn test_every_motif_in_header_once() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new("tfmatrix")?;
    let control = write_file(
        dir.path(),
        "control.txt",
        "A1 x M1 a, :: 1(0)\nA1 x M2 b, :: 1(0)\nA2 x M2 b, :: 2(0)\n",
    )?;
    let query = write_file(
        dir.path(),
        "query.txt",
        "B1 x M3 c, :: 1(0)\nB2 x M1 a, :: 6(0)\n",
    )?;
    let output = dir.path().join("matrix.tsv");

    build(&control, &query, &output)?;

    let contents = fs::read_to_string(&output)?;
    let mut lines = contents.lines();
    let header = lines.next().unwrap().split('\t').collect::<Vec<_>>();
    assert_eq!(header, ["Sequence", "M1 a", "M2 b", "M3 c", "Target"]);

    for line in lines {
        assert_eq!(line.split('\t').count(), header.len());
    }
    Ok(())
}

#[test]
fn test_malformed_count_writes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new("tfmatrix")?;
    let control = write_file(dir.path(), "control.txt", "A1 x PWM1 name, :: 5(0.1)\n")?;
    let query = write_file(
        dir.path(),
        "query.txt",
        "B1 x PWM2 other, :: 2(0.1)\nB2 x PWM2 other, :: many(0.1)\n",
    )?;
    let output = dir.path().join("matrix.tsv");

    let err = build(&control, &query, &output).unwrap_err();
    assert!(err.to_string().contains("line 2"));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_missing_input_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new("tfmatrix")?;
    let query = write_file(dir.path(), "query.txt", "")?;
    let output = dir.path().join("matrix.tsv");

    let err = build(&dir.path().join("missing.txt"), &query, &output).unwrap_err();
    assert!(err.to_string().starts_with("unable to open "));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_fimo_pipeline() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new("tfmatrix")?;
    let control = write_file(
        dir.path(),
        "control.txt",
        "#pattern name\tsequence name\tstart\tstop\n\
         MA1\tchr1:100-200\t3\t9\n\
         MA1\tchr1:100-200\t20\t26\n\
         MA2\tchr2:5-50\t1\t7\n",
    )?;
    let query = write_file(
        dir.path(),
        "query.txt",
        "#pattern name\tsequence name\tstart\tstop\n\
         MA3\tmatch.chr1:100-200\t8\t14\n",
    )?;

    let control = dataset::open_fimo(&control, Class::Control)?;
    let query = dataset::open_fimo(&query, Class::Query)?;
    let schema = Schema::from_datasets(&control, &query);

    let config = tfmatrix::matrix::writer::Config::default()
        .with_delimiter(b',')
        .with_normalized_sequence_names(true);
    let mut writer = Writer::with_config(Vec::new(), config);
    writer.write_matrix(&Matrix::new(&control, &query, &schema))?;

    assert_eq!(
        String::from_utf8(writer.into_inner()?)?,
        "Sequence,MA1,MA2,MA3,Target\n\
         chr1.100.200,2,0,0,0\n\
         chr2.5.50,0,1,0,0\n\
         match.chr1.100.200,0,0,1,1\n"
    );
    Ok(())
}

#[test]
fn test_fimo_sequence_name_with_comma() -> Result<(), Box<dyn std::error::Error>> {
    let control = b"#pattern name\tsequence name\nMA1\tseq,1\nMA2\tseq,1\n";
    let query = b"#pattern name\tsequence name\nMA2\tseq2\n";

    let control = dataset::read_fimo(&mut tfmatrix::Reader::new(&control[..]), Class::Control)?;
    let query = dataset::read_fimo(&mut tfmatrix::Reader::new(&query[..]), Class::Query)?;
    let schema = Schema::from_datasets(&control, &query);

    let config = tfmatrix::matrix::writer::Config::default().with_delimiter(b',');
    let mut writer = Writer::with_config(Vec::new(), config);
    writer.write_matrix(&Matrix::new(&control, &query, &schema))?;

    let output = String::from_utf8(writer.into_inner()?)?;
    assert_eq!(
        output,
        "Sequence,MA1,MA2,Target\n\"seq,1\",1,1,0\nseq2,0,1,1\n"
    );
    Ok(())
}

#[test]
fn test_sam_to_fastq_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new("tfmatrix")?;
    let sam = write_file(
        dir.path(),
        "reads.sam",
        "@HD\tVN:1.6\n\
         r1\t0\tchr1\t1\t60\t4M\t*\t0\t0\tACGT\tIIII\n\
         r2\t0\tchrM\t1\t60\t2M\t*\t0\t0\tGG\tAB\n",
    )?;
    let output = dir.path().join("reads.fastq");

    let mut reader = tfmatrix::reader::open(&sam)?;
    let mut sink = Sink::create(&output)?;
    let summary = tfmatrix::fastq::convert(
        &mut reader,
        &mut sink,
        &tfmatrix::fastq::Filter::ignoring("chrM"),
    )?;
    sink.flush()?;
    sink.commit()?;

    assert_eq!(summary.written, 1);
    assert_eq!(fs::read_to_string(&output)?, "@r1\nACGT\n+\nIIII\n");
    Ok(())
}
