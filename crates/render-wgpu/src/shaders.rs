/// WGSL shader for the puzzle mesh.
///
/// Each vertex picks its cubie transform by `vertex_index / 24`. The
/// projection uses GL depth (`-1..1`), which is remapped to wgpu's `0..1`.
pub const PUZZLE_SHADER: &str = r#"
struct Uniforms {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    model: mat4x4<f32>,
    cubies: array<mat4x4<f32>, 26>,
    palette: array<vec4<f32>, 7>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @builtin(vertex_index) index: u32,
    @location(0) position: vec3<f32>,
    @location(1) tag: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) @interpolate(flat) color_id: u32,
};

const VERTICES_PER_CUBIE: u32 = 24u;
const BLACK: u32 = 6u;
const BORDER: f32 = 0.06;

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let cubie = uniforms.cubies[vertex.index / VERTICES_PER_CUBIE];
    let world = uniforms.model * cubie * vec4<f32>(vertex.position, 1.0);
    var clip = uniforms.projection * uniforms.view * world;
    clip.z = (clip.z + clip.w) * 0.5;

    var out: VertexOutput;
    out.clip_position = clip;
    out.world_position = world.xyz;
    out.uv = vertex.tag.xy;
    out.color_id = u32(vertex.tag.z + 0.5);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let normal = normalize(cross(dpdx(in.world_position), dpdy(in.world_position)));
    let light_dir = normalize(vec3<f32>(0.3, 1.0, 0.5));
    let ambient = 0.45;
    let diffuse = abs(dot(normal, light_dir));
    let lighting = ambient + diffuse * 0.55;

    var color_id = min(in.color_id, BLACK);
    let edge = min(min(in.uv.x, in.uv.y), min(1.0 - in.uv.x, 1.0 - in.uv.y));
    if (edge < BORDER) {
        color_id = BLACK;
    }
    let color = uniforms.palette[color_id];
    return vec4<f32>(color.rgb * lighting, 1.0);
}
"#;
