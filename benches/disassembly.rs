use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use rvdisasm::disasm::riscv::Instruction;
use rvdisasm::{disassemble, DisasmConfig};
use std::hint::black_box;

/// A loop body mixing ALU ops, memory access and backward branches.
const PATTERN: [u32; 8] = [
    0xff010113, // addi sp, sp, -16
    0x00112623, // sw ra, 12(sp)
    0x00b50533, // add a0, a0, a1
    0x02b50533, // mul a0, a0, a1
    0xffc42083, // lw ra, -4(s0)
    0xfe0516e3, // bne a0, zero, -20
    0xfe5ff0ef, // jal ra, -28
    0x00008067, // jalr zero, 0(ra)
];

fn put(data: &mut [u8], offset: usize, bytes: &[u8]) {
    data[offset..offset + bytes.len()].copy_from_slice(bytes);
}

/// ELF32 image with `words` instructions in `.text` and one function symbol.
fn synthetic_image(words: usize) -> Vec<u8> {
    let mut data = vec![0u8; 52];
    let text_offset = data.len();
    for i in 0..words {
        data.extend_from_slice(&PATTERN[i % PATTERN.len()].to_le_bytes());
    }
    let text_size = data.len() - text_offset;

    let strtab_offset = data.len();
    data.extend_from_slice(b"\0bench_main\0");
    while data.len() % 4 != 0 {
        data.push(0);
    }

    let symtab_offset = data.len();
    data.extend_from_slice(&[0u8; 16]);
    data.extend_from_slice(&1u32.to_le_bytes());
    data.extend_from_slice(&0x10000u32.to_le_bytes());
    data.extend_from_slice(&(text_size as u32).to_le_bytes());
    data.extend_from_slice(&[0x12, 0, 1, 0]);

    let shstrtab_offset = data.len();
    data.extend_from_slice(b"\0.text\0.symtab\0.strtab\0.shstrtab\0");
    while data.len() % 4 != 0 {
        data.push(0);
    }

    let shoff = data.len();
    let headers: [[u32; 10]; 5] = [
        [0; 10],
        [1, 1, 6, 0x10000, text_offset as u32, text_size as u32, 0, 0, 4, 0],
        [7, 2, 0, 0, symtab_offset as u32, 32, 3, 1, 4, 16],
        [15, 3, 0, 0, strtab_offset as u32, 12, 0, 0, 1, 0],
        [23, 3, 0, 0, shstrtab_offset as u32, 33, 0, 0, 1, 0],
    ];
    for header in headers {
        for field in header {
            data.extend_from_slice(&field.to_le_bytes());
        }
    }

    put(&mut data, 0, b"\x7fELF\x01\x01\x01");
    put(&mut data, 18, &243u16.to_le_bytes());
    put(&mut data, 0x20, &(shoff as u32).to_le_bytes());
    put(&mut data, 0x30, &5u16.to_le_bytes());
    put(&mut data, 0x32, &4u16.to_le_bytes());
    data
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Elements(PATTERN.len() as u64));
    group.bench_function("pattern", |b| {
        b.iter(|| {
            for word in PATTERN {
                black_box(Instruction::decode(black_box(word)));
            }
        })
    });
    group.finish();
}

fn bench_disassemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("disassemble");
    let config = DisasmConfig::default();
    for words in [256usize, 4096, 65536] {
        let image = synthetic_image(words);
        group.throughput(Throughput::Bytes(image.len() as u64));
        group.bench_function(format!("{}_words", words), |b| {
            b.iter(|| disassemble(black_box(&image), &config))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decode, bench_disassemble);
criterion_main!(benches);
