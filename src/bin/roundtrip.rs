use classic_codecs::compression::{
    entropy, CodeTable, Compression, Huffman, Lz77, Lzw, PrefixCoder, ShannonFano,
};
use classic_codecs::Result;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args_os().skip(1);
    let Some(input) = args.next().map(PathBuf::from) else {
        eprintln!("usage: roundtrip <input> [out_dir]");
        return ExitCode::from(2);
    };
    let out_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    match run(&input, &out_dir) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(input: &Path, out_dir: &Path) -> Result<bool> {
    let data = fs::read(input)?;
    fs::create_dir_all(out_dir)?;
    println!("Byte entropy: {}", entropy(&data));

    let mut ok = true;
    ok &= prefix_round_trip("Shannon-Fano", "shannon_fano", &ShannonFano, &data, out_dir)?;
    ok &= prefix_round_trip("Huffman", "huffman", &Huffman, &data, out_dir)?;
    ok &= stream_round_trip("LZ77", "lz77", &Lz77::default(), &data, out_dir)?;
    ok &= stream_round_trip("LZW", "lzw", &Lzw, &data, out_dir)?;
    Ok(ok)
}

/// Encode, persist the table and packed bits, read both back and decode.
fn prefix_round_trip<C: PrefixCoder>(
    name: &str,
    stem: &str,
    coder: &C,
    data: &[u8],
    out_dir: &Path,
) -> Result<bool> {
    let (packed, table) = coder.encode_packed(data)?;
    println!("{} code table:", name);
    print!("{}", table);

    let table_path = out_dir.join(format!("{}_table.bin", stem));
    let encoded_path = out_dir.join(format!("{}_encoded.bin", stem));
    table.write_to(&mut File::create(&table_path)?)?;
    fs::write(&encoded_path, &packed)?;

    let table = CodeTable::read_from(&mut File::open(&table_path)?)?;
    let packed = fs::read(&encoded_path)?;
    // The packed file has no length header; the symbol count comes from the input.
    let decoded = coder.decode_packed(&packed, &table, Some(data.len()))?;
    fs::write(out_dir.join(format!("{}_decoded.bin", stem)), &decoded)?;

    Ok(report(name, &decoded, data))
}

/// Compress to a record stream, persist it, read it back and decompress.
fn stream_round_trip<C: Compression>(
    name: &str,
    stem: &str,
    codec: &C,
    data: &[u8],
    out_dir: &Path,
) -> Result<bool> {
    let compressed_path = out_dir.join(format!("{}_compressed.bin", stem));
    fs::write(&compressed_path, codec.compress(data)?)?;

    let compressed = fs::read(&compressed_path)?;
    let decoded = codec.decompress(&compressed)?;
    fs::write(out_dir.join(format!("{}_decoded.bin", stem)), &decoded)?;

    Ok(report(name, &decoded, data))
}

fn report(name: &str, decoded: &[u8], original: &[u8]) -> bool {
    let ok = decoded == original;
    if ok {
        println!("{} encoding and decoding succeeded.", name);
    } else {
        println!("{} encoding and decoding failed.", name);
    }
    ok
}
