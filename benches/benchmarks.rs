// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

use std::path::Path;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use iconsprite::{
    Attributes, IconRenderer, IconSize, NormalizedIcon, Sprite, SpriteRepository, assemble_sprite,
    derive_icon_id, normalize_svg,
};

const ICON: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" fill="none" stroke="currentColor" stroke-width="2">
  <path d="M3 9l9-7 9 7v11a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2z"/>
  <polyline points="9 22 9 12 15 12 15 22"/>
</svg>
"#;

fn icons(count: usize,) -> Vec<NormalizedIcon,>
{
    (0..count)
        .map(|index| {
            let relative = format!("group-{}/icon-{index}.svg", index % 8);
            NormalizedIcon::new(derive_icon_id(&relative,), relative, normalize_svg(ICON,),)
        },)
        .collect()
}

fn benchmark_normalize_svg(c: &mut Criterion,)
{
    c.bench_function("normalize_svg_dimensions", |b| b.iter(|| normalize_svg(black_box(ICON,),),),);

    let with_view_box = ICON.replace("width=\"24\" height=\"24\"", "viewBox=\"0 0 24 24\"",);
    c.bench_function("normalize_svg_view_box", |b| {
        b.iter(|| normalize_svg(black_box(&with_view_box,),),)
    },);
}

fn benchmark_assemble_sprite(c: &mut Criterion,)
{
    let small = icons(16,);
    c.bench_function("assemble_sprite_16", |b| {
        b.iter(|| assemble_sprite("icons", black_box(small.clone(),),),)
    },);

    let large = icons(1_000,);
    c.bench_function("assemble_sprite_1000", |b| {
        b.iter(|| {
            let sprite = assemble_sprite("icons", black_box(large.clone(),),);
            black_box(sprite.document.len(),)
        },)
    },);
}

fn benchmark_render(c: &mut Criterion,)
{
    let repository = SpriteRepository::new();
    repository.register(Sprite::from_assembled(
        "icons",
        Path::new("assets/icons",),
        true,
        assemble_sprite("icons", icons(256,),),
    ),);
    let renderer = IconRenderer::new(&repository,);
    let attributes = Attributes::new();

    c.bench_function("render_sized_hit", |b| {
        b.iter(|| renderer.render_sized(black_box("group-3-icon-131",), IconSize::Large, &attributes,),)
    },);
    c.bench_function("render_miss", |b| {
        b.iter(|| renderer.render(black_box("unknown",), &attributes,),)
    },);
}

criterion_group!(benches, benchmark_normalize_svg, benchmark_assemble_sprite, benchmark_render);
criterion_main!(benches);
